//! Row model for the `review_state` table

use chrono::{DateTime, Duration, Utc};
use recall_algo::MemoryState;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use serde::{Deserialize, Serialize};

use crate::storage::StorageResult;

/// Position of `interval_secs` in `review_state`
const INTERVAL_COLUMN: usize = 3;

// ============================================================
// ReviewRecord - one persisted memory state
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub deck_name: String,
    pub card_id: String,
    pub state: MemoryState,
    /// Wall-clock time of the write, for diagnostics only
    pub updated_at: DateTime<Utc>,
}

impl ReviewRecord {
    pub fn new(deck_name: &str, card_id: &str, state: MemoryState) -> Self {
        Self {
            deck_name: deck_name.to_string(),
            card_id: card_id.to_string(),
            state,
            updated_at: Utc::now(),
        }
    }

    pub fn from_row(row: &Row) -> SqliteResult<Self> {
        let interval_secs: i64 = row.get("interval_secs")?;
        let interval = Duration::try_seconds(interval_secs.max(0)).ok_or(
            rusqlite::Error::IntegralValueOutOfRange(INTERVAL_COLUMN, interval_secs),
        )?;
        Ok(Self {
            deck_name: row.get("deck_name")?,
            card_id: row.get("card_id")?,
            state: MemoryState {
                repetition_count: row.get("repetitions")?,
                interval,
                ease_factor: row.get("ease")?,
                due_at: row.get("due_at")?,
                last_reviewed_at: row.get("last_reviewed_at")?,
            },
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert or replace the state for `(deck_name, card_id)`
    pub fn upsert(&self, conn: &Connection) -> StorageResult<()> {
        conn.execute(
            r#"
            INSERT INTO review_state (
                deck_name, card_id, repetitions, interval_secs, ease,
                due_at, last_reviewed_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(deck_name, card_id) DO UPDATE SET
                repetitions = excluded.repetitions,
                interval_secs = excluded.interval_secs,
                ease = excluded.ease,
                due_at = excluded.due_at,
                last_reviewed_at = excluded.last_reviewed_at,
                updated_at = excluded.updated_at
            "#,
            params![
                self.deck_name,
                self.card_id,
                self.state.repetition_count,
                self.state.interval.num_seconds(),
                self.state.ease_factor,
                self.state.due_at,
                self.state.last_reviewed_at,
                self.updated_at,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::migrations;
    use chrono::TimeZone;

    #[test]
    fn test_upsert_and_read_back() {
        let conn = Connection::open_in_memory().expect("Failed to open connection");
        migrations::run_migrations(&conn).expect("Failed to run migrations");

        let due = Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap();
        let state = MemoryState {
            repetition_count: 2,
            interval: Duration::days(3),
            ease_factor: 2.35,
            due_at: due,
            last_reviewed_at: Some(due - Duration::days(3)),
        };
        let record = ReviewRecord::new("concepts", "card-1", state.clone());
        record.upsert(&conn).expect("Failed to upsert");

        let loaded = conn
            .query_row(
                "SELECT * FROM review_state WHERE deck_name = ?1 AND card_id = ?2",
                params!["concepts", "card-1"],
                |row| ReviewRecord::from_row(row),
            )
            .expect("Failed to load");

        assert_eq!(loaded.state, state);
        assert_eq!(loaded.deck_name, "concepts");
    }
}
