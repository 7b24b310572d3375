//! User registration and profile routes.

use axum::extract::{Path, State};
use axum::Json;
use chat_core::UserId;
use database::{user, NewUser, User};
use serde::Deserialize;
use tracing::info;

use crate::error::{GatewayError, Result};
use crate::identity::Identity;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub language: String,
}

/// Register a new user.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<User>> {
    if req.name.trim().is_empty() {
        return Err(GatewayError::BadRequest("name must not be empty".to_string()));
    }
    if !chat_core::is_supported(&req.language) {
        return Err(GatewayError::BadRequest(format!(
            "unsupported language '{}'",
            req.language
        )));
    }

    let created = user::create_user(state.db().pool(), &NewUser::new(req.name, req.language)).await?;
    info!("Registered user {} ({})", created.id, created.name);
    Ok(Json(created))
}

/// List all users.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(user::list_users(state.db().pool()).await?))
}

/// One user's profile.
pub async fn profile(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>> {
    Ok(Json(user::get_user(state.db().pool(), id).await?))
}

#[derive(Deserialize)]
pub struct LanguageRequest {
    pub language: String,
}

/// Change the caller's preferred language.
pub async fn set_language(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(req): Json<LanguageRequest>,
) -> Result<Json<User>> {
    if !chat_core::is_supported(&req.language) {
        return Err(GatewayError::BadRequest(format!(
            "unsupported language '{}'",
            req.language
        )));
    }

    user::update_language(state.db().pool(), user_id, &req.language).await?;
    Ok(Json(user::get_user(state.db().pool(), user_id).await?))
}

#[derive(Deserialize)]
pub struct ProfileRequest {
    pub avatar: Option<String>,
    pub status_line: Option<String>,
}

/// Update the caller's avatar and status line.
pub async fn set_profile(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<User>> {
    let current = user::get_user(state.db().pool(), user_id).await?;
    let avatar = req.avatar.as_deref().unwrap_or(&current.avatar);
    let status_line = req.status_line.as_deref().unwrap_or(&current.status_line);

    user::update_profile(state.db().pool(), user_id, avatar, status_line).await?;
    Ok(Json(user::get_user(state.db().pool(), user_id).await?))
}
