use std::io::{BufRead, Write};

use rand::Rng;
use recall_algo::Scheduler;

use crate::deck::Card;
use crate::error::AppResult;
use crate::render::Style;
use crate::selector::{SelectionMode, Selector};
use crate::session::{Clock, SessionReport, SessionRunner};
use crate::storage::ReviewStore;

pub struct ReviewRequest<'a> {
    pub deck: &'a str,
    pub mode: SelectionMode,
    pub num: usize,
}

/// Select cards and run an interactive session over them
#[allow(clippy::too_many_arguments)]
pub fn run<S, C, R, I, W>(
    store: &S,
    scheduler: &Scheduler,
    cards: &[Card],
    request: &ReviewRequest<'_>,
    clock: C,
    rng: &mut R,
    input: I,
    mut output: W,
    style: Style,
) -> AppResult<SessionReport>
where
    S: ReviewStore + ?Sized,
    C: Clock,
    R: Rng + ?Sized,
    I: BufRead,
    W: Write,
{
    let now = clock.now();
    let selection = Selector::new(store, request.deck).select(
        cards,
        &request.mode,
        request.num,
        now,
        rng,
    )?;

    if selection.used_fallback {
        writeln!(
            output,
            "{}",
            style.dim("No cards are due right now; here is a random one.")
        )?;
    }

    tracing::info!(
        deck = request.deck,
        mode = ?request.mode,
        selected = selection.cards.len(),
        "starting review session"
    );

    SessionRunner::new(scheduler, store, request.deck, clock, input, output)
        .with_style(style)
        .run(&selection.cards)
}
