//! Review session runner
//!
//! For each selected card: show the front, reveal the back, read a grade,
//! update the memory state and persist it before moving on. Every card is its
//! own committed unit; aborting keeps what was already saved.
//!
//! Per-card states: `Presented -> AwaitingOutcome -> Updated` or
//! `AwaitingOutcome -> Terminated` on abort. Unrecognised grades re-prompt.

use std::io::{BufRead, Write};

use chrono::{DateTime, Utc};
use recall_algo::{Grade, MemoryState, Scheduler};

use crate::deck::Card;
use crate::error::AppResult;
use crate::render::{self, Style};
use crate::storage::ReviewStore;

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F: Fn() -> DateTime<Utc>> Clock for F {
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// Cards graded and persisted
    pub reviewed: usize,
    /// The user quit before the last card
    pub aborted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardOutcome {
    Updated(MemoryState),
    Terminated,
}

enum Input {
    Line(String),
    Abort,
}

pub struct SessionRunner<'a, S: ReviewStore + ?Sized, C: Clock, R: BufRead, W: Write> {
    scheduler: &'a Scheduler,
    store: &'a S,
    deck: &'a str,
    clock: C,
    input: R,
    output: W,
    style: Style,
}

impl<'a, S, C, R, W> SessionRunner<'a, S, C, R, W>
where
    S: ReviewStore + ?Sized,
    C: Clock,
    R: BufRead,
    W: Write,
{
    pub fn new(
        scheduler: &'a Scheduler,
        store: &'a S,
        deck: &'a str,
        clock: C,
        input: R,
        output: W,
    ) -> Self {
        Self {
            scheduler,
            store,
            deck,
            clock,
            input,
            output,
            style: Style::plain(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn run(&mut self, cards: &[&Card]) -> AppResult<SessionReport> {
        let mut report = SessionReport::default();

        for (position, card) in cards.iter().enumerate() {
            if cards.len() > 1 {
                writeln!(
                    self.output,
                    "{}",
                    self.style.dim(&format!("[{}/{}]", position + 1, cards.len()))
                )?;
            }

            match self.review_card(card)? {
                CardOutcome::Updated(_) => report.reviewed += 1,
                CardOutcome::Terminated => {
                    report.aborted = true;
                    break;
                }
            }
        }

        tracing::info!(
            deck = self.deck,
            reviewed = report.reviewed,
            aborted = report.aborted,
            "session finished"
        );
        Ok(report)
    }

    /// Present one card and, unless aborted, persist its new state
    pub fn review_card(&mut self, card: &Card) -> AppResult<CardOutcome> {
        // Presented
        render::render_front(&mut self.output, card, self.style)?;
        write!(self.output, "Press Enter to show the back (q to quit)...")?;
        self.output.flush()?;
        if let Input::Abort = self.read_input()? {
            writeln!(self.output)?;
            return Ok(CardOutcome::Terminated);
        }
        render::render_back(&mut self.output, card)?;

        // AwaitingOutcome
        let current = self.store.get(self.deck, &card.id)?;
        let preview = self.scheduler.preview_intervals(current.as_ref());
        render::render_grade_menu(&mut self.output, &preview, self.style)?;

        let grade = loop {
            write!(self.output, "Enter 1, 2, 3 or 4 (q to quit): ")?;
            self.output.flush()?;
            match self.read_input()? {
                Input::Abort => {
                    writeln!(self.output)?;
                    return Ok(CardOutcome::Terminated);
                }
                Input::Line(line) => match line.parse::<Grade>() {
                    Ok(grade) => break grade,
                    Err(err) => {
                        tracing::debug!(input = %line, "rejected grade input");
                        writeln!(self.output, "{}", self.style.error(&format!("{err}")))?;
                    }
                },
            }
        };

        // Updated: compute then write, nothing in between
        let now = self.clock.now();
        let next = self.scheduler.update(current.as_ref(), grade, now);
        self.store.put(self.deck, &card.id, &next)?;

        tracing::info!(
            deck = self.deck,
            card_id = %card.id,
            grade = %grade,
            repetitions = next.repetition_count,
            interval_secs = next.interval.num_seconds(),
            "card reviewed"
        );
        writeln!(
            self.output,
            "{} next review {} ({})",
            self.style.ok("Scheduling updated:"),
            render::format_timestamp(next.due_at),
            render::format_interval(next.interval)
        )?;

        Ok(CardOutcome::Updated(next))
    }

    fn read_input(&mut self) -> AppResult<Input> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Input::Abort);
        }
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
            return Ok(Input::Abort);
        }
        Ok(Input::Line(trimmed.to_string()))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
