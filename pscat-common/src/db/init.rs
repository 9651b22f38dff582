//! Database initialization
//!
//! Opens (creating if needed) the catalog database and creates every table
//! idempotently, so the service starts against an empty directory with no
//! manual setup step.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Busy timeout for writers waiting on the SQLite write lock
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // WAL lets readers proceed while an import holds the write lock
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// In-memory database with the full schema
///
/// Limited to one connection that never expires: every SQLite `:memory:`
/// connection is its own database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;
    create_problem_statements_table(pool).await?;
    create_domain_sequences_table(pool).await?;
    Ok(())
}

/// Create the users table
///
/// Users own problem statements and authenticate with a bearer token whose
/// SHA-256 digest is stored in `token_hash`.
pub async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            role TEXT NOT NULL CHECK (role IN ('admin', 'faculty', 'student')),
            token_hash TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the problem_statements table and its query indexes
///
/// List-valued fields are JSON arrays stored as TEXT.
pub async fn create_problem_statements_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS problem_statements (
            guid TEXT PRIMARY KEY,
            custom_id TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            abstract TEXT NOT NULL,
            domain TEXT NOT NULL,
            category TEXT NOT NULL CHECK (category IN ('Major', 'Minor', 'Capstone')),
            difficulty TEXT NOT NULL CHECK (difficulty IN ('Beginner', 'Intermediate', 'Advanced')),
            duration TEXT NOT NULL,
            technologies TEXT NOT NULL DEFAULT '[]',
            deliverables TEXT NOT NULL DEFAULT '[]',
            prerequisites TEXT NOT NULL DEFAULT '[]',
            learning_outcomes TEXT NOT NULL DEFAULT '[]',
            tags TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL DEFAULT 'Draft' CHECK (status IN ('Active', 'Draft', 'Archived')),
            featured INTEGER NOT NULL DEFAULT 0,
            view_count INTEGER NOT NULL DEFAULT 0 CHECK (view_count >= 0),
            created_by TEXT NOT NULL REFERENCES users(guid),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_problem_statements_domain_status ON problem_statements(domain, status)",
        "CREATE INDEX IF NOT EXISTS idx_problem_statements_difficulty_status ON problem_statements(difficulty, status)",
        "CREATE INDEX IF NOT EXISTS idx_problem_statements_featured_status ON problem_statements(featured, status)",
        "CREATE INDEX IF NOT EXISTS idx_problem_statements_created_by ON problem_statements(created_by)",
        "CREATE INDEX IF NOT EXISTS idx_problem_statements_view_count ON problem_statements(view_count DESC)",
    ];

    for sql in indexes {
        sqlx::query(sql).execute(pool).await?;
    }

    Ok(())
}

/// Create the per-domain identifier sequence table
///
/// One row per domain string holding the last sequence number handed out.
pub async fn create_domain_sequences_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS domain_sequences (
            domain TEXT PRIMARY KEY,
            last_seq INTEGER NOT NULL CHECK (last_seq >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
