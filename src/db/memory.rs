//! In-memory record store.
//!
//! Records live for the lifetime of the process.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RsvpStore;
use crate::errors::AppError;
use crate::models::{AfterpartyRsvp, NewAfterpartyRsvp, NewWeddingRsvp, ResponseType, WeddingRsvp};

#[derive(Default)]
struct Tables {
    afterparty: Vec<AfterpartyRsvp>,
    wedding: Vec<WeddingRsvp>,
}

/// Record store holding everything in process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RsvpStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert_afterparty(&self, rsvp: NewAfterpartyRsvp) -> Result<i64, AppError> {
        let mut tables = self.tables.write().await;
        // Records are never deleted, so the next id is always len + 1.
        let id = tables.afterparty.len() as i64 + 1;
        tables.afterparty.push(rsvp.into_stored(id));
        Ok(id)
    }

    async fn list_afterparty(&self) -> Result<Vec<AfterpartyRsvp>, AppError> {
        let mut rsvps = self.tables.read().await.afterparty.clone();
        rsvps.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rsvps)
    }

    async fn insert_wedding(&self, rsvp: NewWeddingRsvp) -> Result<i64, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.wedding.len() as i64 + 1;
        tables.wedding.push(rsvp.into_stored(id));
        Ok(id)
    }

    async fn list_wedding(
        &self,
        response_type: Option<ResponseType>,
    ) -> Result<Vec<WeddingRsvp>, AppError> {
        let mut rsvps: Vec<WeddingRsvp> = self
            .tables
            .read()
            .await
            .wedding
            .iter()
            .filter(|rsvp| response_type.map_or(true, |t| rsvp.response_type() == t))
            .cloned()
            .collect();
        rsvps.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rsvps)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
