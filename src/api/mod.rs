//! REST API module.
//!
//! Contains all API routes and handlers.

mod afterparty;
mod health;
mod wedding;

pub use afterparty::*;
pub use health::*;
pub use wedding::*;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;

/// Success response with an explicit status code.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub status: StatusCode,
    pub body: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn created(body: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Body returned by both POST endpoints.
#[derive(Debug, Serialize)]
pub struct Created {
    pub message: String,
    pub rsvp_id: i64,
}

/// Unwrap a JSON body, treating a missing or unparseable one as `null`.
///
/// Validation then reports it as an empty payload.
fn json_payload(payload: Result<Json<Value>, JsonRejection>) -> Value {
    match payload {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!("Unreadable JSON body: {}", rejection.body_text());
            Value::Null
        }
    }
}

/// Fallback for paths without a route.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
