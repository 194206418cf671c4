//! Terminal flashcards with spaced repetition
//!
//! Decks are JSON files; review state lives in a SQLite store. Scheduling and
//! selection policy come from `recall-algo`; this crate wires them to files,
//! the store and the terminal.

pub mod cli;
pub mod commands;
pub mod config;
pub mod deck;
pub mod error;
pub mod logging;
pub mod render;
pub mod selector;
pub mod session;
pub mod storage;

use std::io::{BufRead, Write};

use rand::Rng;
use recall_algo::{Scheduler, SchedulerParams};

pub use cli::{Action, Cli, ListScope};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use session::{Clock, SessionReport, SystemClock};

use crate::commands::review::ReviewRequest;
use crate::deck::{DeckSource, JsonDeckSource};
use crate::render::Style;
use crate::selector::{validate_count, SelectionMode};
use crate::storage::DatabaseManager;

/// Result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reviewed(SessionReport),
    Listed(usize),
    Found(usize),
}

/// Run with the system clock and thread rng
pub fn run<I: BufRead, W: Write>(
    cli: &Cli,
    config: &Config,
    input: I,
    output: W,
    style: Style,
) -> AppResult<Outcome> {
    run_with(
        cli,
        config,
        input,
        output,
        style,
        SystemClock,
        &mut rand::thread_rng(),
    )
}

/// Validation order: deck, count, scheduler settings, then the store. Nothing is opened or
/// written when an earlier step fails.
pub fn run_with<I, W, C, R>(
    cli: &Cli,
    config: &Config,
    input: I,
    mut output: W,
    style: Style,
    clock: C,
    rng: &mut R,
) -> AppResult<Outcome>
where
    I: BufRead,
    W: Write,
    C: Clock,
    R: Rng + ?Sized,
{
    let deck = cli.deck.as_str();
    let cards = JsonDeckSource::new(&config.deck_dir).load(deck)?;

    match cli.action() {
        Action::Search(query) => {
            let found = commands::search::run(&cards, &query, &mut output, style)?;
            Ok(Outcome::Found(found))
        }
        Action::List(scope) => {
            let db = DatabaseManager::open(&config.db_path)?;
            let rows = commands::list::run(&db.review_states(), deck, &cards, scope, &mut output)?;
            Ok(Outcome::Listed(rows))
        }
        Action::Review { mode, num } => {
            validate_count(num, cards.len())?;
            if let SelectionMode::Named(name) = &mode {
                selector::find_by_name(&cards, name)?;
            }

            let params = SchedulerParams::default()
                .with_relearn_minutes(config.relearn_minutes)
                .map_err(|err| AppError::InvalidConfig(err.to_string()))?;
            let scheduler = Scheduler::new(params);

            let db = DatabaseManager::open(&config.db_path)?;
            let store = db.review_states();
            let request = ReviewRequest { deck, mode, num };
            let report = commands::review::run(
                &store, &scheduler, &cards, &request, clock, rng, input, output, style,
            )?;
            Ok(Outcome::Reviewed(report))
        }
    }
}
