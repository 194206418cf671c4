//! Database migrations
//!
//! Keeps the review store schema in step with the binary.
//!
//! ## Strategy
//! - each migration runs inside its own transaction
//! - applied versions are recorded in `schema_migrations`
//! - already applied versions are skipped, so opening is idempotent

use rusqlite::Connection;

use crate::storage::{StorageError, StorageResult};

/// Latest schema version
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// V1 schema
const INIT_SCHEMA: &str = include_str!("schema.sql");

#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i32,
    pub name: String,
    pub sql: String,
}

impl Migration {
    pub fn new(version: i32, name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
            sql: sql.into(),
        }
    }
}

/// All migrations, ordered by version
pub fn get_migrations() -> Vec<Migration> {
    vec![
        // V1: review_state table
        Migration::new(1, "initial review state table", INIT_SCHEMA),
        // V2: due-ordered scans per deck
        Migration::new(
            2,
            "index review state by due date",
            r#"
            CREATE INDEX IF NOT EXISTS idx_review_state_deck_due
                ON review_state(deck_name, due_at);
            "#,
        ),
    ]
}

fn ensure_migrations_table(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at INTEGER NOT NULL
        );
        "#,
    )
    .map_err(|e| StorageError::Migration(format!("cannot create schema_migrations: {}", e)))?;

    Ok(())
}

/// Highest applied version, 0 for a fresh database
pub fn get_current_version(conn: &Connection) -> i32 {
    if ensure_migrations_table(conn).is_err() {
        return 0;
    }

    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

fn get_applied_versions(conn: &Connection) -> StorageResult<Vec<i32>> {
    ensure_migrations_table(conn)?;

    let mut stmt = conn.prepare("SELECT version FROM schema_migrations ORDER BY version")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i32>, _>>()?;

    Ok(versions)
}

fn record_migration(conn: &Connection, migration: &Migration) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.name,
            chrono::Utc::now().timestamp()
        ],
    )?;

    Ok(())
}

/// Apply every pending migration and return the resulting version
pub fn run_migrations(conn: &Connection) -> Result<i32, StorageError> {
    ensure_migrations_table(conn)?;

    let applied_versions = get_applied_versions(conn)?;
    let mut final_version = get_current_version(conn);

    tracing::debug!(
        current = final_version,
        target = CURRENT_SCHEMA_VERSION,
        "checking review store schema"
    );

    for migration in get_migrations() {
        if applied_versions.contains(&migration.version) {
            continue;
        }

        tracing::info!(version = migration.version, name = %migration.name, "running migration");

        if let Err(e) = execute_migration_in_transaction(conn, &migration) {
            tracing::error!(version = migration.version, error = %e, "migration failed");
            return Err(e);
        }
        final_version = migration.version;
    }

    Ok(final_version)
}

fn execute_migration_in_transaction(conn: &Connection, migration: &Migration) -> StorageResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(&migration.sql).map_err(|e| {
        StorageError::Migration(format!("v{} failed: {}", migration.version, e))
    })?;
    record_migration(&tx, migration)?;

    tx.commit()?;
    Ok(())
}
