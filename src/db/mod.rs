//! Record store for RSVP persistence.
//!
//! Handlers only see the [`RsvpStore`] trait. SQLite is the production
//! backend; the in-memory store serves `RSVP_STORE=memory` and tests.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::errors::AppError;
use crate::models::{AfterpartyRsvp, NewAfterpartyRsvp, NewWeddingRsvp, ResponseType, WeddingRsvp};

/// Create, query and health operations over both RSVP tables.
///
/// Lists are ordered newest first: `created_at` descending, then `id`
/// descending. Ids are assigned by the store and increase per table.
#[async_trait]
pub trait RsvpStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    async fn insert_afterparty(&self, rsvp: NewAfterpartyRsvp) -> Result<i64, AppError>;

    async fn list_afterparty(&self) -> Result<Vec<AfterpartyRsvp>, AppError>;

    async fn insert_wedding(&self, rsvp: NewWeddingRsvp) -> Result<i64, AppError>;

    /// List wedding RSVPs, optionally restricted to one response type.
    async fn list_wedding(
        &self,
        response_type: Option<ResponseType>,
    ) -> Result<Vec<WeddingRsvp>, AppError>;

    /// Trivial round-trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Create the RSVP tables if they don't exist.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS afterparty (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            telegram TEXT NOT NULL,
            phone_number TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS wedding_rsvp (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            response_type TEXT NOT NULL CHECK (response_type IN ('yes', 'no', 'maybe')),
            full_name TEXT NOT NULL,
            telegram_username TEXT,
            phone_number TEXT,
            dietary_restrictions TEXT,
            message TEXT,
            note TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_afterparty_created_at ON afterparty(created_at);
        CREATE INDEX IF NOT EXISTS idx_wedding_rsvp_created_at ON wedding_rsvp(created_at);
        CREATE INDEX IF NOT EXISTS idx_wedding_rsvp_response_type ON wedding_rsvp(response_type);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
