//! SQLite review store
//!
//! Durable `(deck, card id) -> MemoryState` mapping:
//! - one table shared by every deck, keyed by deck name and card id
//! - WAL journal with `synchronous=FULL`, so a returned `put` survives a crash
//! - versioned migrations applied on open

// ============================================================
// Submodules
// ============================================================

pub mod migrations;
pub mod models;
pub mod review_state;

// ============================================================
// Re-exports
// ============================================================

pub use migrations::run_migrations;
pub use models::ReviewRecord;
pub use review_state::ReviewStateRepository;

use std::collections::BTreeSet;
use std::path::Path;

use recall_algo::MemoryState;
use rusqlite::Connection;
use thiserror::Error;

// ============================================================
// Errors
// ============================================================

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("corrupt review record: {0}")]
    Corrupt(String),

    #[error("cannot prepare store location: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

// ============================================================
// ReviewStore - the persistence seam used by selector and session
// ============================================================

/// Keyed persistence of memory states.
///
/// `put` must be durable when it returns. Entries are never removed by
/// normal operation; states whose card left the deck stay as orphans.
pub trait ReviewStore {
    fn get(&self, deck: &str, card_id: &str) -> StorageResult<Option<MemoryState>>;

    fn put(&self, deck: &str, card_id: &str, state: &MemoryState) -> StorageResult<()>;

    /// Ids of every card in `deck` that has a stored state
    fn all_reviewed(&self, deck: &str) -> StorageResult<BTreeSet<String>>;
}

// ============================================================
// DatabaseManager - connection owner
// ============================================================

pub struct DatabaseManager {
    connection: Connection,
    db_path: String,
}

impl DatabaseManager {
    /// Open (or create) the store at `db_path` and bring its schema up to date.
    ///
    /// Missing parent directories are created.
    pub fn open<P: AsRef<Path>>(db_path: P) -> StorageResult<Self> {
        let path = db_path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let connection = Connection::open(path)?;
        connection.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=FULL;
             PRAGMA foreign_keys=ON;",
        )?;

        let manager = Self {
            connection,
            db_path: path.to_string_lossy().to_string(),
        };
        manager.initialize()?;

        tracing::debug!(db_path = %manager.db_path, "review store opened");
        Ok(manager)
    }

    /// In-memory store for tests
    pub fn in_memory() -> StorageResult<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute_batch("PRAGMA foreign_keys=ON;")?;

        let manager = Self {
            connection,
            db_path: ":memory:".to_string(),
        };
        manager.initialize()?;
        Ok(manager)
    }

    pub fn initialize(&self) -> StorageResult<()> {
        migrations::run_migrations(&self.connection)?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    pub fn review_states(&self) -> ReviewStateRepository<'_> {
        ReviewStateRepository::new(&self.connection)
    }
}
