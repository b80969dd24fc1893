//! Wedding RSVP model.
//!
//! A wedding RSVP carries one of three mutually exclusive response shapes. In
//! memory the shape is a [`WeddingResponse`] enum; on the wire and in the
//! database it is flattened into [`WeddingRsvpRow`], where fields belonging
//! to other variants are null.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Discriminator for the wedding RSVP variants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Yes,
    No,
    Maybe,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Yes => "yes",
            ResponseType::No => "no",
            ResponseType::Maybe => "maybe",
        }
    }
}

impl FromStr for ResponseType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(ResponseType::Yes),
            "no" => Ok(ResponseType::No),
            "maybe" => Ok(ResponseType::Maybe),
            _ => Err(ValidationError::InvalidVariant),
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific part of a wedding RSVP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeddingResponse {
    Yes {
        telegram_username: String,
        phone_number: String,
        dietary_restrictions: Option<String>,
    },
    No {
        message: Option<String>,
    },
    Maybe {
        note: Option<String>,
    },
}

impl WeddingResponse {
    pub fn response_type(&self) -> ResponseType {
        match self {
            WeddingResponse::Yes { .. } => ResponseType::Yes,
            WeddingResponse::No { .. } => ResponseType::No,
            WeddingResponse::Maybe { .. } => ResponseType::Maybe,
        }
    }
}

/// A stored wedding RSVP.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(into = "WeddingRsvpRow")]
pub struct WeddingRsvp {
    pub id: i64,
    pub full_name: String,
    pub response: WeddingResponse,
    pub created_at: DateTime<Utc>,
}

impl WeddingRsvp {
    pub fn response_type(&self) -> ResponseType {
        self.response.response_type()
    }
}

/// A validated wedding submission, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWeddingRsvp {
    pub full_name: String,
    pub response: WeddingResponse,
    pub created_at: DateTime<Utc>,
}

impl NewWeddingRsvp {
    /// Attach the store-assigned id.
    pub fn into_stored(self, id: i64) -> WeddingRsvp {
        WeddingRsvp {
            id,
            full_name: self.full_name,
            response: self.response,
            created_at: self.created_at,
        }
    }
}

/// Flat column layout shared by the `wedding_rsvp` table and the JSON API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeddingRsvpRow {
    pub id: i64,
    pub response_type: String,
    pub full_name: String,
    pub telegram_username: Option<String>,
    pub phone_number: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub message: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<WeddingRsvp> for WeddingRsvpRow {
    fn from(rsvp: WeddingRsvp) -> Self {
        let mut row = WeddingRsvpRow {
            id: rsvp.id,
            response_type: rsvp.response_type().as_str().to_string(),
            full_name: rsvp.full_name,
            telegram_username: None,
            phone_number: None,
            dietary_restrictions: None,
            message: None,
            note: None,
            created_at: rsvp.created_at,
        };

        match rsvp.response {
            WeddingResponse::Yes {
                telegram_username,
                phone_number,
                dietary_restrictions,
            } => {
                row.telegram_username = Some(telegram_username);
                row.phone_number = Some(phone_number);
                row.dietary_restrictions = dietary_restrictions;
            }
            WeddingResponse::No { message } => row.message = message,
            WeddingResponse::Maybe { note } => row.note = note,
        }

        row
    }
}

/// Reason a stored row cannot be turned back into a [`WeddingRsvp`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRow {
    #[error("wedding_rsvp row {id} has unknown response_type {value:?}")]
    UnknownResponseType { id: i64, value: String },
    #[error("wedding_rsvp row {id} is a yes response without {field}")]
    MissingYesField { id: i64, field: &'static str },
}

impl TryFrom<WeddingRsvpRow> for WeddingRsvp {
    type Error = MalformedRow;

    fn try_from(row: WeddingRsvpRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let response_type: ResponseType =
            row.response_type
                .parse()
                .map_err(|_| MalformedRow::UnknownResponseType {
                    id,
                    value: row.response_type.clone(),
                })?;

        let response = match response_type {
            ResponseType::Yes => WeddingResponse::Yes {
                telegram_username: row.telegram_username.ok_or(MalformedRow::MissingYesField {
                    id,
                    field: "telegram_username",
                })?,
                phone_number: row.phone_number.ok_or(MalformedRow::MissingYesField {
                    id,
                    field: "phone_number",
                })?,
                dietary_restrictions: row.dietary_restrictions,
            },
            ResponseType::No => WeddingResponse::No {
                message: row.message,
            },
            ResponseType::Maybe => WeddingResponse::Maybe { note: row.note },
        };

        Ok(WeddingRsvp {
            id,
            full_name: row.full_name,
            response,
            created_at: row.created_at,
        })
    }
}

/// One value per response type.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ByResponseType<T> {
    pub yes: T,
    pub no: T,
    pub maybe: T,
}

impl<T> ByResponseType<T> {
    pub fn get_mut(&mut self, response_type: ResponseType) -> &mut T {
        match response_type {
            ResponseType::Yes => &mut self.yes,
            ResponseType::No => &mut self.no,
            ResponseType::Maybe => &mut self.maybe,
        }
    }
}

/// Response body for GET /api/wedding-rsvp.
#[derive(Debug, Clone, Serialize)]
pub struct WeddingList {
    pub rsvps: Vec<WeddingRsvp>,
    pub rsvps_by_type: ByResponseType<Vec<WeddingRsvp>>,
    pub count: usize,
    pub count_by_type: ByResponseType<usize>,
}

impl WeddingList {
    /// Partition an already ordered list into per-variant buckets.
    ///
    /// Each bucket keeps the relative order of `rsvps`.
    pub fn grouped(rsvps: Vec<WeddingRsvp>) -> Self {
        let mut rsvps_by_type: ByResponseType<Vec<WeddingRsvp>> = ByResponseType::default();
        for rsvp in &rsvps {
            rsvps_by_type
                .get_mut(rsvp.response_type())
                .push(rsvp.clone());
        }

        let count_by_type = ByResponseType {
            yes: rsvps_by_type.yes.len(),
            no: rsvps_by_type.no.len(),
            maybe: rsvps_by_type.maybe.len(),
        };

        Self {
            count: rsvps.len(),
            rsvps,
            rsvps_by_type,
            count_by_type,
        }
    }
}
