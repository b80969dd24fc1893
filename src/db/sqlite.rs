//! SQLite-backed record store.
//!
//! Uses prepared statements; every insert is a single atomic statement.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::RsvpStore;
use crate::errors::AppError;
use crate::models::{
    AfterpartyRsvp, NewAfterpartyRsvp, NewWeddingRsvp, ResponseType, WeddingRsvp,
    WeddingRsvpRow,
};

const LIST_WEDDING: &str = r#"SELECT id, response_type, full_name, telegram_username, phone_number,
        dietary_restrictions, message, note, created_at
   FROM wedding_rsvp ORDER BY created_at DESC, id DESC"#;

const LIST_WEDDING_BY_TYPE: &str = r#"SELECT id, response_type, full_name, telegram_username, phone_number,
        dietary_restrictions, message, note, created_at
   FROM wedding_rsvp WHERE response_type = ? ORDER BY created_at DESC, id DESC"#;

/// Record store over a SQLite connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RsvpStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn insert_afterparty(&self, rsvp: NewAfterpartyRsvp) -> Result<i64, AppError> {
        let result = sqlx::query(
            "INSERT INTO afterparty (name, telegram, phone_number, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&rsvp.name)
        .bind(&rsvp.telegram)
        .bind(&rsvp.phone_number)
        .bind(timestamp(&rsvp.created_at))
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list_afterparty(&self) -> Result<Vec<AfterpartyRsvp>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, telegram, phone_number, created_at FROM afterparty ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let rsvps = rows
            .iter()
            .map(afterparty_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rsvps)
    }

    async fn insert_wedding(&self, rsvp: NewWeddingRsvp) -> Result<i64, AppError> {
        // Flatten through the row shape so foreign-variant columns are NULL.
        let row = WeddingRsvpRow::from(rsvp.into_stored(0));

        let result = sqlx::query(
            r#"INSERT INTO wedding_rsvp
                (response_type, full_name, telegram_username, phone_number,
                 dietary_restrictions, message, note, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&row.response_type)
        .bind(&row.full_name)
        .bind(&row.telegram_username)
        .bind(&row.phone_number)
        .bind(&row.dietary_restrictions)
        .bind(&row.message)
        .bind(&row.note)
        .bind(timestamp(&row.created_at))
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list_wedding(
        &self,
        response_type: Option<ResponseType>,
    ) -> Result<Vec<WeddingRsvp>, AppError> {
        let rows = match response_type {
            Some(response_type) => {
                sqlx::query(LIST_WEDDING_BY_TYPE)
                    .bind(response_type.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => sqlx::query(LIST_WEDDING).fetch_all(&self.pool).await?,
        };

        let mut rsvps = Vec::with_capacity(rows.len());
        for row in &rows {
            rsvps.push(WeddingRsvp::try_from(wedding_from_row(row)?)?);
        }
        Ok(rsvps)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Fixed-width UTC timestamps keep lexical order equal to chronological order.
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn afterparty_from_row(row: &SqliteRow) -> Result<AfterpartyRsvp, sqlx::Error> {
    Ok(AfterpartyRsvp {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        telegram: row.try_get("telegram")?,
        phone_number: row.try_get("phone_number")?,
        created_at: row.try_get("created_at")?,
    })
}

fn wedding_from_row(row: &SqliteRow) -> Result<WeddingRsvpRow, sqlx::Error> {
    Ok(WeddingRsvpRow {
        id: row.try_get("id")?,
        response_type: row.try_get("response_type")?,
        full_name: row.try_get("full_name")?,
        telegram_username: row.try_get("telegram_username")?,
        phone_number: row.try_get("phone_number")?,
        dietary_restrictions: row.try_get("dietary_restrictions")?,
        message: row.try_get("message")?,
        note: row.try_get("note")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::WeddingResponse;
    use chrono::Duration;
    use tempfile::TempDir;

    async fn store() -> (SqliteStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"), 2)
            .await
            .expect("Failed to init DB");
        (SqliteStore::new(pool), temp_dir)
    }

    #[test]
    fn test_timestamp_is_fixed_width() {
        let whole = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let fractional = whole + Duration::microseconds(1);
        assert_eq!(timestamp(&whole), "2026-01-01T00:00:00.000000Z");
        assert_eq!(timestamp(&fractional), "2026-01-01T00:00:00.000001Z");
        assert!(timestamp(&whole) < timestamp(&fractional));
    }

    #[tokio::test]
    async fn test_afterparty_ordering_and_ids() {
        let (store, _dir) = store().await;
        let base = Utc::now();

        // Inserted out of chronological order on purpose.
        for (name, offset) in [("second", 10), ("first", 0), ("third", 20)] {
            store
                .insert_afterparty(NewAfterpartyRsvp {
                    name: name.to_string(),
                    telegram: "@t".to_string(),
                    phone_number: "1".to_string(),
                    created_at: base + Duration::seconds(offset),
                })
                .await
                .unwrap();
        }

        let rsvps = store.list_afterparty().await.unwrap();
        let names: Vec<&str> = rsvps.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
        let mut ids: Vec<i64> = rsvps.iter().map(|r| r.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_wedding_round_trip_and_filter() {
        let (store, _dir) = store().await;
        let now = Utc::now();

        let yes_id = store
            .insert_wedding(NewWeddingRsvp {
                full_name: "Jane Doe".to_string(),
                response: WeddingResponse::Yes {
                    telegram_username: "@janedoe".to_string(),
                    phone_number: "+6512345678".to_string(),
                    dietary_restrictions: None,
                },
                created_at: now,
            })
            .await
            .unwrap();
        store
            .insert_wedding(NewWeddingRsvp {
                full_name: "John Doe".to_string(),
                response: WeddingResponse::No {
                    message: Some("Sorry".to_string()),
                },
                created_at: now + Duration::seconds(1),
            })
            .await
            .unwrap();

        let all = store.list_wedding(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].full_name, "John Doe");

        let yes = store.list_wedding(Some(ResponseType::Yes)).await.unwrap();
        assert_eq!(yes.len(), 1);
        assert_eq!(yes[0].id, yes_id);
        assert_eq!(
            yes[0].response,
            WeddingResponse::Yes {
                telegram_username: "@janedoe".to_string(),
                phone_number: "+6512345678".to_string(),
                dietary_restrictions: None,
            }
        );

        let maybe = store.list_wedding(Some(ResponseType::Maybe)).await.unwrap();
        assert!(maybe.is_empty());
    }

    #[tokio::test]
    async fn test_ping_fails_after_close() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite"), 1)
            .await
            .unwrap();
        let store = SqliteStore::new(pool.clone());
        assert!(store.ping().await.is_ok());

        pool.close().await;
        assert!(matches!(store.ping().await, Err(AppError::Database(_))));
    }
}
