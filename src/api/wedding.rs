//! Wedding RSVP endpoints.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use chrono::Utc;
use serde_json::Value;

use super::{json_payload, ApiResponse, ApiResult, Created};
use crate::models::WeddingList;
use crate::validation::{parse_response_filter, validate_wedding};
use crate::AppState;

/// POST /api/wedding-rsvp - Submit a wedding RSVP.
pub async fn submit_wedding_rsvp(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Created> {
    let rsvp = validate_wedding(&json_payload(payload), Utc::now()).inspect_err(|e| {
        tracing::warn!("Rejected wedding RSVP: {}", e);
    })?;

    let response_type = rsvp.response.response_type();
    let rsvp_id = state.store.insert_wedding(rsvp).await?;
    tracing::info!(rsvp_id, %response_type, "Wedding RSVP received");

    Ok(ApiResponse::created(Created {
        message: format!("Wedding RSVP ({}) received", response_type),
        rsvp_id,
    }))
}

/// GET /api/wedding-rsvp - List wedding RSVPs grouped by response type.
///
/// Query pairs are read as a list so a repeated `response_type` uses its
/// first value instead of failing deserialization.
pub async fn list_wedding_rsvps(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<WeddingList> {
    let response_type = params
        .iter()
        .find(|(key, _)| key == "response_type")
        .map(|(_, value)| value.as_str());
    let filter = parse_response_filter(response_type)?;
    let rsvps = state.store.list_wedding(filter).await?;
    Ok(ApiResponse::ok(WeddingList::grouped(rsvps)))
}
