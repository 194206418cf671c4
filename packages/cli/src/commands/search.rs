use std::io::Write;

use recall_algo::selection;

use crate::deck::Card;
use crate::error::{AppError, AppResult};
use crate::render::{self, Style};

/// Print every card whose name contains `query`; read-only
pub fn run<W: Write>(cards: &[Card], query: &str, out: &mut W, style: Style) -> AppResult<usize> {
    let matches = selection::search_names(cards, query);
    if matches.is_empty() {
        return Err(AppError::CardNotFound(query.to_string()));
    }

    writeln!(
        out,
        "{}",
        style.accent(&format!("{} card(s) matching '{}'", matches.len(), query))
    )?;
    for &index in &matches {
        render::render_card(out, &cards[index], style)?;
    }

    tracing::debug!(query, matches = matches.len(), "search finished");
    Ok(matches.len())
}
