//! Afterparty RSVP endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Utc;
use serde_json::Value;

use super::{json_payload, ApiResponse, ApiResult, Created};
use crate::models::AfterpartyList;
use crate::validation::validate_afterparty;
use crate::AppState;

/// POST /api/rsvp - Submit an afterparty RSVP.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Created> {
    let rsvp = validate_afterparty(&json_payload(payload), Utc::now()).inspect_err(|e| {
        tracing::warn!("Rejected afterparty RSVP: {}", e);
    })?;

    let rsvp_id = state.store.insert_afterparty(rsvp).await?;
    tracing::info!(rsvp_id, "Afterparty RSVP received");

    Ok(ApiResponse::created(Created {
        message: "RSVP received".to_string(),
        rsvp_id,
    }))
}

/// GET /api/rsvp - List afterparty RSVPs, newest first.
pub async fn list_rsvps(State(state): State<AppState>) -> ApiResult<AfterpartyList> {
    let rsvps = state.store.list_afterparty().await?;
    Ok(ApiResponse::ok(AfterpartyList::from(rsvps)))
}
