//! Review state repository
//!
//! CRUD over `review_state`, exposed through the [`ReviewStore`] trait.

use std::collections::BTreeSet;

use recall_algo::MemoryState;
use rusqlite::{params, Connection, OptionalExtension};

use crate::storage::models::ReviewRecord;
use crate::storage::{ReviewStore, StorageError, StorageResult};

pub struct ReviewStateRepository<'a> {
    conn: &'a Connection,
}

impl<'a> ReviewStateRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Full record including bookkeeping columns
    pub fn get_record(&self, deck: &str, card_id: &str) -> StorageResult<Option<ReviewRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT * FROM review_state WHERE deck_name = ?1 AND card_id = ?2",
                params![deck, card_id],
                |row| ReviewRecord::from_row(row),
            )
            .optional()?;

        Ok(record)
    }

    /// Number of stored states for a deck
    pub fn count(&self, deck: &str) -> StorageResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM review_state WHERE deck_name = ?1",
            params![deck],
            |row| row.get(0),
        )?;

        usize::try_from(count).map_err(|_| StorageError::Corrupt(format!("row count {}", count)))
    }

    fn validate(record: &ReviewRecord) -> StorageResult<()> {
        if !record.state.ease_factor.is_finite() {
            return Err(StorageError::Corrupt(format!(
                "{}/{} has non-finite ease",
                record.deck_name, record.card_id
            )));
        }
        Ok(())
    }
}

impl ReviewStore for ReviewStateRepository<'_> {
    fn get(&self, deck: &str, card_id: &str) -> StorageResult<Option<MemoryState>> {
        match self.get_record(deck, card_id)? {
            Some(record) => {
                Self::validate(&record)?;
                Ok(Some(record.state))
            }
            None => Ok(None),
        }
    }

    fn put(&self, deck: &str, card_id: &str, state: &MemoryState) -> StorageResult<()> {
        let record = ReviewRecord::new(deck, card_id, state.clone());
        Self::validate(&record)?;

        // Autocommit: the row is on disk once execute returns
        record.upsert(self.conn)?;

        tracing::debug!(
            deck,
            card_id,
            repetitions = state.repetition_count,
            due_at = %state.due_at,
            "review state saved"
        );
        Ok(())
    }

    fn all_reviewed(&self, deck: &str) -> StorageResult<BTreeSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT card_id FROM review_state WHERE deck_name = ?1")?;

        let ids = stmt
            .query_map(params![deck], |row| row.get::<_, String>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DatabaseManager;
    use chrono::{Duration, TimeZone, Utc};

    fn sample_state(reps: u32) -> MemoryState {
        let reviewed = Utc.with_ymd_and_hms(2025, 1, 10, 8, 30, 0).unwrap();
        MemoryState {
            repetition_count: reps,
            interval: Duration::days(3),
            ease_factor: 2.5,
            due_at: reviewed + Duration::days(3),
            last_reviewed_at: Some(reviewed),
        }
    }

    #[test]
    fn test_get_missing_is_none() {
        let db = DatabaseManager::in_memory().expect("Failed to open store");
        let repo = db.review_states();
        assert_eq!(repo.get("concepts", "nope").expect("get failed"), None);
    }

    #[test]
    fn test_put_and_get() {
        let db = DatabaseManager::in_memory().expect("Failed to open store");
        let repo = db.review_states();

        let state = sample_state(2);
        repo.put("concepts", "card-1", &state).expect("put failed");

        let loaded = repo
            .get("concepts", "card-1")
            .expect("get failed")
            .expect("state not found");
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_put_is_idempotent() {
        let db = DatabaseManager::in_memory().expect("Failed to open store");
        let repo = db.review_states();

        let state = sample_state(1);
        repo.put("concepts", "card-1", &state).expect("first put");
        repo.put("concepts", "card-1", &state).expect("second put");

        assert_eq!(repo.count("concepts").unwrap(), 1);
        assert_eq!(repo.get("concepts", "card-1").unwrap(), Some(state));
    }

    #[test]
    fn test_put_overwrites_previous_state() {
        let db = DatabaseManager::in_memory().expect("Failed to open store");
        let repo = db.review_states();

        repo.put("concepts", "card-1", &sample_state(1)).unwrap();
        repo.put("concepts", "card-1", &sample_state(4)).unwrap();

        let loaded = repo.get("concepts", "card-1").unwrap().unwrap();
        assert_eq!(loaded.repetition_count, 4);
    }

    #[test]
    fn test_decks_are_separate_namespaces() {
        let db = DatabaseManager::in_memory().expect("Failed to open store");
        let repo = db.review_states();

        repo.put("concepts", "shared-id", &sample_state(1)).unwrap();
        repo.put("neetcode150", "shared-id", &sample_state(3)).unwrap();
        repo.put("neetcode150", "other", &sample_state(1)).unwrap();

        let concepts = repo.all_reviewed("concepts").unwrap();
        let neetcode = repo.all_reviewed("neetcode150").unwrap();
        assert_eq!(concepts.len(), 1);
        assert_eq!(neetcode.len(), 2);
        assert!(neetcode.contains("other"));
        assert_eq!(
            repo.get("concepts", "shared-id").unwrap().unwrap().repetition_count,
            1
        );
    }

    #[test]
    fn test_non_finite_ease_is_rejected() {
        let db = DatabaseManager::in_memory().expect("Failed to open store");
        let repo = db.review_states();

        let mut state = sample_state(1);
        state.ease_factor = f64::NAN;
        let err = repo.put("concepts", "card-1", &state).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
        assert_eq!(repo.get("concepts", "card-1").unwrap(), None);
    }
}
