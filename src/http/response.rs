//! Synthesized error replies.
//!
//! # Responsibilities
//! - Map relay failures to appropriate HTTP status codes
//! - Produce the JSON error payload returned to the caller
//!
//! # Design Decisions
//! - One payload shape for every failure: `{"error", "message"}`
//! - The `error` field carries the status line reason, the `message` a
//!   human-readable hint

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// JSON body of a synthesized error reply.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: &'static str,
}

/// Build an error reply with the given status and message.
pub fn error_reply(status: StatusCode, message: &'static str) -> Response {
    let payload = ErrorBody {
        error: status.canonical_reason().unwrap_or("Error"),
        message,
    };
    (status, Json(payload)).into_response()
}
