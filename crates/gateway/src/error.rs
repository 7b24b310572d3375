//! Error types for the gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use dispatcher::DispatchError;
use thiserror::Error;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Dispatch pipeline error.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Malformed request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid identity header.
    #[error("Missing or invalid x-user-id header")]
    Unauthorized,
}

impl GatewayError {
    fn status(&self) -> StatusCode {
        match self {
            GatewayError::Dispatch(e) => match e {
                DispatchError::EmptyMessage => StatusCode::BAD_REQUEST,
                DispatchError::RecipientNotFound(_) | DispatchError::GroupNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                DispatchError::NotAGroupMember { .. } | DispatchError::NotTheReceiver { .. } => {
                    StatusCode::FORBIDDEN
                }
                DispatchError::Storage(e) => storage_status(e),
                DispatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            GatewayError::Database(e) => storage_status(e),
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

fn storage_status(e: &DatabaseError) -> StatusCode {
    match e {
        DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
        DatabaseError::AlreadyExists { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
        }

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for gateway handlers.
pub type Result<T> = std::result::Result<T, GatewayError>;
