//! Card Selection Policy
//!
//! Pure ordering and sampling over a deck's cards. Callers supply the memory
//! state lookups; nothing here touches storage.

use chrono::{DateTime, Utc};
use rand::seq::index;
use rand::Rng;

use crate::scheduler::is_due;
use crate::types::MemoryState;

/// Anything that can be looked up by id or by display name
pub trait Named {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

/// Outcome of resolving a user-supplied card name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch {
    NotFound,
    Unique(usize),
    Ambiguous(Vec<usize>),
}

/// Indices of due cards, most overdue first.
///
/// `states[i]` is the memory state of the i-th card in deck order. Unseen
/// cards rank ahead of every reviewed card and keep deck order among
/// themselves; reviewed cards sort by `due_at`, ties by deck order.
pub fn order_due(states: &[Option<&MemoryState>], now: DateTime<Utc>) -> Vec<usize> {
    let mut due: Vec<(usize, Option<DateTime<Utc>>)> = states
        .iter()
        .enumerate()
        .filter(|(_, state)| is_due(**state, now))
        .map(|(i, state)| (i, state.map(|s| s.due_at)))
        .collect();

    // None < Some(_), so unseen cards come first
    due.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
    due.into_iter().map(|(i, _)| i).collect()
}

/// `amount` distinct indices out of `0..len`, uniformly at random
pub fn sample_without_replacement<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    amount: usize,
) -> Vec<usize> {
    if len == 0 || amount == 0 {
        return Vec::new();
    }
    index::sample(rng, len, amount.min(len)).into_vec()
}

/// One index out of `0..len`, or `None` for an empty range
pub fn pick_one<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

/// Resolve `query` against card ids (exact) and names (case-insensitive)
pub fn match_name<T: Named>(items: &[T], query: &str) -> NameMatch {
    let needle = query.trim().to_lowercase();
    let matches: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.id() == query.trim() || item.name().to_lowercase() == needle)
        .map(|(i, _)| i)
        .collect();

    match matches.len() {
        0 => NameMatch::NotFound,
        1 => NameMatch::Unique(matches[0]),
        _ => NameMatch::Ambiguous(matches),
    }
}

/// Indices of items whose name contains `query`, case-insensitively
pub fn search_names<T: Named>(items: &[T], query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.name().to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}
