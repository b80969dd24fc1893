//! Submission validation.
//!
//! Turns an untyped JSON payload into a normalized record or a
//! [`ValidationError`]. Rules are applied in order and the first failure wins.
//! All accepted strings are stored trimmed; optional fields that are absent,
//! null, falsy, or blank after trimming become `None`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{NewAfterpartyRsvp, NewWeddingRsvp, ResponseType, WeddingResponse};

const AFTERPARTY_FIELDS: [&str; 3] = ["name", "telegram", "phone_number"];

/// Reason a submission was rejected. Always reported to the client as 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No data provided")]
    EmptyPayload,
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("{0} must be a non-empty string")]
    MissingField(&'static str),
    #[error("{field} is required for {variant} responses")]
    RequiredForVariant {
        field: &'static str,
        variant: ResponseType,
    },
    #[error("{0} must be a string")]
    InvalidField(&'static str),
    #[error("response_type must be one of: yes, no, maybe")]
    InvalidVariant,
}

/// Validate an afterparty submission.
///
/// Every missing, non-string or blank field is reported together.
pub fn validate_afterparty(
    payload: &Value,
    now: DateTime<Utc>,
) -> Result<NewAfterpartyRsvp, ValidationError> {
    let fields = payload_object(payload)?;

    let [name, telegram, phone_number] = AFTERPARTY_FIELDS.map(|field| required_str(fields, field));

    match (name, telegram, phone_number) {
        (Some(name), Some(telegram), Some(phone_number)) => Ok(NewAfterpartyRsvp {
            name,
            telegram,
            phone_number,
            created_at: now,
        }),
        (name, telegram, phone_number) => {
            let present = [name.is_some(), telegram.is_some(), phone_number.is_some()];
            let missing = AFTERPARTY_FIELDS
                .iter()
                .zip(present)
                .filter(|(_, present)| !present)
                .map(|(field, _)| *field)
                .collect();
            Err(ValidationError::MissingFields(missing))
        }
    }
}

/// Validate a wedding submission and dispatch on its `response_type`.
pub fn validate_wedding(
    payload: &Value,
    now: DateTime<Utc>,
) -> Result<NewWeddingRsvp, ValidationError> {
    let fields = payload_object(payload)?;

    let response_type: ResponseType = fields
        .get("response_type")
        .and_then(Value::as_str)
        .ok_or(ValidationError::InvalidVariant)?
        .parse()?;

    let full_name =
        required_str(fields, "full_name").ok_or(ValidationError::MissingField("full_name"))?;

    let response = match response_type {
        ResponseType::Yes => {
            let required = |field: &'static str| {
                required_str(fields, field).ok_or(ValidationError::RequiredForVariant {
                    field,
                    variant: ResponseType::Yes,
                })
            };
            WeddingResponse::Yes {
                telegram_username: required("telegram_username")?,
                phone_number: required("phone_number")?,
                dietary_restrictions: optional_str(fields, "dietary_restrictions")?,
            }
        }
        ResponseType::No => WeddingResponse::No {
            message: optional_str(fields, "message")?,
        },
        ResponseType::Maybe => WeddingResponse::Maybe {
            note: optional_str(fields, "note")?,
        },
    };

    Ok(NewWeddingRsvp {
        full_name,
        response,
        created_at: now,
    })
}

/// Parse the optional `response_type` list filter. An empty value means no filter.
pub fn parse_response_filter(raw: Option<&str>) -> Result<Option<ResponseType>, ValidationError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

fn payload_object(payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
    match payload {
        Value::Object(fields) if !fields.is_empty() => Ok(fields),
        _ => Err(ValidationError::EmptyPayload),
    }
}

fn required_str(fields: &Map<String, Value>, field: &str) -> Option<String> {
    fields
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn optional_str(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(value) if is_falsy(value) => Ok(None),
        Some(_) => Err(ValidationError::InvalidField(field)),
    }
}

// `false`, zero, and empty arrays or objects count as "not provided".
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}
