//! Card selector
//!
//! Wires the pure selection policy from `recall-algo` to a deck and a review
//! store. Modes:
//! - due: due cards, most overdue first, falling back to one random card
//! - random: `num` distinct cards, ignoring due state
//! - named: the single card matching a name or id

use chrono::{DateTime, Utc};
use rand::Rng;
use recall_algo::selection::{self, NameMatch};
use recall_algo::MemoryState;

use crate::deck::Card;
use crate::error::{AppError, AppResult};
use crate::storage::ReviewStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    Due,
    Random,
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'c> {
    pub cards: Vec<&'c Card>,
    /// Due mode found nothing due and picked a random card instead
    pub used_fallback: bool,
}

/// `num` must lie in `1..=deck_size`; never clamped
pub fn validate_count(num: usize, deck_size: usize) -> AppResult<()> {
    if num == 0 || num > deck_size {
        return Err(AppError::InvalidCount { num, deck_size });
    }
    Ok(())
}

pub struct Selector<'a, S: ReviewStore + ?Sized> {
    store: &'a S,
    deck: &'a str,
}

impl<'a, S: ReviewStore + ?Sized> Selector<'a, S> {
    pub fn new(store: &'a S, deck: &'a str) -> Self {
        Self { store, deck }
    }

    pub fn select<'c, R: Rng + ?Sized>(
        &self,
        cards: &'c [Card],
        mode: &SelectionMode,
        num: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> AppResult<Selection<'c>> {
        validate_count(num, cards.len())?;

        match mode {
            SelectionMode::Due => self.select_due(cards, num, now, rng),
            SelectionMode::Random => {
                let picked = selection::sample_without_replacement(rng, cards.len(), num);
                Ok(Selection {
                    cards: picked.into_iter().map(|i| &cards[i]).collect(),
                    used_fallback: false,
                })
            }
            SelectionMode::Named(name) => {
                let card = find_by_name(cards, name)?;
                Ok(Selection {
                    cards: vec![card],
                    used_fallback: false,
                })
            }
        }
    }

    fn select_due<'c, R: Rng + ?Sized>(
        &self,
        cards: &'c [Card],
        num: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> AppResult<Selection<'c>> {
        let states: Vec<Option<MemoryState>> = cards
            .iter()
            .map(|card| self.store.get(self.deck, &card.id))
            .collect::<Result<_, _>>()?;
        let lookups: Vec<Option<&MemoryState>> = states.iter().map(Option::as_ref).collect();

        let due = selection::order_due(&lookups, now);
        tracing::debug!(deck = self.deck, due = due.len(), total = cards.len(), "due cards ordered");

        if due.is_empty() {
            // Never leave the user with nothing to study
            let fallback = selection::pick_one(rng, cards.len())
                .map(|i| &cards[i])
                .into_iter()
                .collect();
            tracing::info!(deck = self.deck, "no cards due, picking a random card");
            return Ok(Selection {
                cards: fallback,
                used_fallback: true,
            });
        }

        Ok(Selection {
            cards: due.into_iter().take(num).map(|i| &cards[i]).collect(),
            used_fallback: false,
        })
    }
}

/// Exactly one card by name (case-insensitive) or id
pub fn find_by_name<'c>(cards: &'c [Card], name: &str) -> AppResult<&'c Card> {
    match selection::match_name(cards, name) {
        NameMatch::Unique(i) => Ok(&cards[i]),
        NameMatch::NotFound => Err(AppError::CardNotFound(name.to_string())),
        NameMatch::Ambiguous(indices) => Err(AppError::AmbiguousName {
            name: name.to_string(),
            ids: indices.into_iter().map(|i| cards[i].id.clone()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DatabaseManager;
    use chrono::{Duration, TimeZone};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
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
            card("c1", "Binary Search"),
            card("c2", "Two Pointers"),
            card("c3", "Sliding Window"),
        ]
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 10, 0, 0).unwrap()
    }

    fn ids(selection: &Selection<'_>) -> Vec<String> {
        selection.cards.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_invalid_counts_are_rejected() {
        let db = DatabaseManager::in_memory().unwrap();
        let store = db.review_states();
        let selector = Selector::new(&store, "concepts");
        let cards = deck();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for num in [0, 4, 5] {
            let err = selector
                .select(&cards, &SelectionMode::Due, num, now(), &mut rng)
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidCount { deck_size: 3, .. }));
        }
    }

    #[test]
    fn test_due_mode_prefers_unseen_in_deck_order() {
        let db = DatabaseManager::in_memory().unwrap();
        let store = db.review_states();
        let scheduler = Scheduler::default();

        // c1 reviewed and not yet due again
        let reviewed = scheduler.update(None, Grade::Good, now());
        store.put("concepts", "c1", &reviewed).unwrap();

        let cards = deck();
        let selector = Selector::new(&store, "concepts");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let selection = selector
            .select(&cards, &SelectionMode::Due, 3, now(), &mut rng)
            .unwrap();

        assert_eq!(ids(&selection), vec!["c2", "c3"]);
        assert!(!selection.used_fallback);
    }

    #[test]
    fn test_due_mode_orders_overdue_cards() {
        let db = DatabaseManager::in_memory().unwrap();
        let store = db.review_states();
        let scheduler = Scheduler::default();

        let long_ago = scheduler.update(None, Grade::Good, now() - Duration::days(10));
        let recently = scheduler.update(None, Grade::Good, now() - Duration::days(2));
        store.put("concepts", "c1", &recently).unwrap();
        store.put("concepts", "c2", &long_ago).unwrap();

        let cards = deck();
        let selector = Selector::new(&store, "concepts");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let selection = selector
            .select(&cards, &SelectionMode::Due, 3, now(), &mut rng)
            .unwrap();

        assert_eq!(ids(&selection), vec!["c3", "c2", "c1"]);
    }

    #[test]
    fn test_due_mode_whole_deck_is_reproducible() {
        let db = DatabaseManager::in_memory().unwrap();
        let store = db.review_states();
        let scheduler = Scheduler::default();

        let overdue = scheduler.update(None, Grade::Good, now() - Duration::days(10));
        let barely_due = scheduler.update(None, Grade::Good, now() - Duration::days(3));
        store.put("concepts", "c1", &overdue).unwrap();
        store.put("concepts", "c2", &barely_due).unwrap();

        let cards = deck();
        let selector = Selector::new(&store, "concepts");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let first = selector
            .select(&cards, &SelectionMode::Due, cards.len(), now(), &mut rng)
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let second = selector
            .select(&cards, &SelectionMode::Due, cards.len(), now(), &mut rng)
            .unwrap();

        assert_eq!(ids(&first), vec!["c3", "c1", "c2"]);
        assert_eq!(ids(&first), ids(&second));
        assert!(!first.used_fallback);
    }

    #[test]
    fn test_due_mode_falls_back_to_one_random_card() {
        let db = DatabaseManager::in_memory().unwrap();
        let store = db.review_states();
        let scheduler = Scheduler::default();
        let cards = deck();

        for c in &cards {
            let state = scheduler.update(None, Grade::Easy, now());
            store.put("concepts", &c.id, &state).unwrap();
        }

        let selector = Selector::new(&store, "concepts");
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let selection = selector
            .select(&cards, &SelectionMode::Due, 2, now(), &mut rng)
            .unwrap();

        assert!(selection.used_fallback);
        assert_eq!(selection.cards.len(), 1);
    }

    #[test]
    fn test_random_mode_draws_distinct_cards() {
        let db = DatabaseManager::in_memory().unwrap();
        let store = db.review_states();
        let cards = deck();
        let selector = Selector::new(&store, "concepts");
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let selection = selector
            .select(&cards, &SelectionMode::Random, 3, now(), &mut rng)
            .unwrap();
        let mut picked = ids(&selection);
        picked.sort();
        assert_eq!(picked, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn test_named_mode() {
        let db = DatabaseManager::in_memory().unwrap();
        let store = db.review_states();
        let cards = deck();
        let selector = Selector::new(&store, "concepts");
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let selection = selector
            .select(
                &cards,
                &SelectionMode::Named("sliding window".to_string()),
                1,
                now(),
                &mut rng,
            )
            .unwrap();
        assert_eq!(ids(&selection), vec!["c3"]);

        let err = selector
            .select(
                &cards,
                &SelectionMode::Named("Heap".to_string()),
                1,
                now(),
                &mut rng,
            )
            .unwrap_err();
        assert!(matches!(err, AppError::CardNotFound(name) if name == "Heap"));
    }

    #[test]
    fn test_named_mode_rejects_duplicates() {
        let cards = vec![card("a", "Trie"), card("b", "TRIE")];
        let err = find_by_name(&cards, "trie").unwrap_err();
        assert!(matches!(err, AppError::AmbiguousName { ids, .. } if ids == vec!["a", "b"]));
    }
}
