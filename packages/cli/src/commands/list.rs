use std::collections::HashMap;
use std::io::Write;

use recall_algo::MemoryState;

use crate::cli::ListScope;
use crate::deck::Card;
use crate::error::AppResult;
use crate::render;
use crate::storage::ReviewStore;

const HEADERS: [&str; 5] = ["Name", "Interval", "Reps", "Ease", "Due"];

/// Print the deck listing and return the number of rows
pub fn run<S: ReviewStore + ?Sized, W: Write>(
    store: &S,
    deck: &str,
    cards: &[Card],
    scope: ListScope,
    out: &mut W,
) -> AppResult<usize> {
    let rows = match scope {
        ListScope::All => all_rows(store, deck, cards)?,
        ListScope::InDb => reviewed_rows(store, deck, cards)?,
    };

    if rows.is_empty() {
        match scope {
            ListScope::All => writeln!(out, "Deck '{deck}' has no cards.")?,
            ListScope::InDb => writeln!(out, "No reviewed cards in deck '{deck}'.")?,
        }
        return Ok(0);
    }

    writeln!(out, "{}", render::render_table(&HEADERS, &rows))?;
    tracing::debug!(deck, rows = rows.len(), ?scope, "deck listed");
    Ok(rows.len())
}

fn row(name: String, state: Option<&MemoryState>) -> Vec<String> {
    let mut cells = vec![name];
    cells.extend(render::state_cells(state));
    cells
}

/// Every card in declaration order
fn all_rows<S: ReviewStore + ?Sized>(
    store: &S,
    deck: &str,
    cards: &[Card],
) -> AppResult<Vec<Vec<String>>> {
    let mut rows = Vec::with_capacity(cards.len());
    for card in cards {
        let state = store.get(deck, &card.id)?;
        rows.push(row(card.name.clone(), state.as_ref()));
    }
    Ok(rows)
}

/// Reviewed cards only, by name; states without a deck card are kept and marked
fn reviewed_rows<S: ReviewStore + ?Sized>(
    store: &S,
    deck: &str,
    cards: &[Card],
) -> AppResult<Vec<Vec<String>>> {
    let names: HashMap<&str, &str> = cards
        .iter()
        .map(|card| (card.id.as_str(), card.name.as_str()))
        .collect();

    let mut named = Vec::new();
    for id in store.all_reviewed(deck)? {
        let Some(state) = store.get(deck, &id)? else {
            continue;
        };
        let label = match names.get(id.as_str()) {
            Some(name) => name.to_string(),
            None => {
                tracing::warn!(deck, card_id = %id, "stored state has no card in deck");
                format!("{id} (not in deck)")
            }
        };
        named.push((label, state));
    }

    named.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));

    Ok(named
        .into_iter()
        .map(|(label, state)| row(label, Some(&state)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DatabaseManager;
    use chrono::{TimeZone, Utc};
    use recall_algo::{Grade, Scheduler};

    fn card(id: &str, name: &str) -> Card {
        Card {
            id: id.to_string(),
            name: name.to_string(),
            deck: "concepts".to_string(),
            back: Vec::new(),
        }
    }

    fn deck() -> Vec<Card> {
        vec![
            card("c1", "two pointers"),
            card("c2", "Binary Search"),
            card("c3", "Sliding Window"),
        ]
    }

    #[test]
    fn test_list_all_shows_unseen_placeholders() {
        let db = DatabaseManager::in_memory().unwrap();
        let store = db.review_states();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let state = Scheduler::default().update(None, Grade::Good, now);
        store.put("concepts", "c2", &state).unwrap();

        let mut out = Vec::new();
        let count = run(&store, "concepts", &deck(), ListScope::All, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count, 3);
        let rows: Vec<&str> = text.lines().filter(|l| l.starts_with("| ")).skip(1).collect();
        assert!(rows[0].starts_with("| two pointers "));
        assert!(rows[0].contains(" - "));
        assert!(rows[1].starts_with("| Binary Search "));
        assert!(rows[1].contains(" 1d "));
    }

    #[test]
    fn test_list_in_db_sorts_by_name_and_marks_orphans() {
        let db = DatabaseManager::in_memory().unwrap();
        let store = db.review_states();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let state = Scheduler::default().update(None, Grade::Hard, now);
        for id in ["c1", "c2", "gone"] {
            store.put("concepts", id, &state).unwrap();
        }

        let mut out = Vec::new();
        let count = run(&store, "concepts", &deck(), ListScope::InDb, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count, 3);
        let names: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("| "))
            .skip(1)
            .filter_map(|l| l.split('|').nth(1))
            .map(str::trim)
            .collect();
        assert_eq!(names, vec!["Binary Search", "gone (not in deck)", "two pointers"]);
    }

    #[test]
    fn test_list_in_db_empty() {
        let db = DatabaseManager::in_memory().unwrap();
        let store = db.review_states();

        let mut out = Vec::new();
        let count = run(&store, "concepts", &deck(), ListScope::InDb, &mut out).unwrap();
        assert_eq!(count, 0);
        assert!(String::from_utf8(out).unwrap().contains("No reviewed cards"));
    }
}
