//! Contact list routes.

use axum::extract::State;
use axum::Json;
use chat_core::UserId;
use database::{contact, user, User};
use serde::Deserialize;

use crate::error::Result;
use crate::identity::Identity;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddContactRequest {
    pub contact_id: UserId,
}

/// Add a user to the caller's contact list. Idempotent.
pub async fn add(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(req): Json<AddContactRequest>,
) -> Result<Json<Vec<User>>> {
    // Surfaces NotFound for unknown contacts.
    user::get_user(state.db().pool(), req.contact_id).await?;
    contact::add_contact(state.db().pool(), user_id, req.contact_id).await?;
    Ok(Json(contact::contacts_of(state.db().pool(), user_id).await?))
}

/// The caller's contact list.
pub async fn list(
    State(state): State<AppState>,
    Identity(user_id): Identity,
) -> Result<Json<Vec<User>>> {
    Ok(Json(contact::contacts_of(state.db().pool(), user_id).await?))
}
