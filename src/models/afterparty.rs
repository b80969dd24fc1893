//! Afterparty RSVP model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored afterparty RSVP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AfterpartyRsvp {
    pub id: i64,
    pub name: String,
    pub telegram: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

/// A validated afterparty submission, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAfterpartyRsvp {
    pub name: String,
    pub telegram: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

impl NewAfterpartyRsvp {
    /// Attach the store-assigned id.
    pub fn into_stored(self, id: i64) -> AfterpartyRsvp {
        AfterpartyRsvp {
            id,
            name: self.name,
            telegram: self.telegram,
            phone_number: self.phone_number,
            created_at: self.created_at,
        }
    }
}

/// Response body for GET /api/rsvp.
#[derive(Debug, Clone, Serialize)]
pub struct AfterpartyList {
    pub rsvps: Vec<AfterpartyRsvp>,
    pub count: usize,
}

impl From<Vec<AfterpartyRsvp>> for AfterpartyList {
    fn from(rsvps: Vec<AfterpartyRsvp>) -> Self {
        Self {
            count: rsvps.len(),
            rsvps,
        }
    }
}
