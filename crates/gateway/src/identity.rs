//! Caller identity extraction.
//!
//! Clients identify themselves with an `x-user-id` header. There is no
//! authentication layer here; the gateway sits behind one.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chat_core::UserId;

use crate::error::GatewayError;

/// The authenticated user id taken from the `x-user-id` header.
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub UserId);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .map(Identity)
            .ok_or(GatewayError::Unauthorized)
    }
}
