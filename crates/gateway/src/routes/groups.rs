//! Group management and history routes.

use axum::extract::{Path, State};
use axum::Json;
use chat_core::{GroupId, UserId};
use database::{group, Group};
use dispatcher::GroupMessageView;
use serde::Deserialize;
use tracing::info;

use crate::error::{GatewayError, Result};
use crate::identity::Identity;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Create a group with the caller as admin.
pub async fn create(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(req): Json<CreateGroupRequest>,
) -> Result<Json<Group>> {
    if req.name.trim().is_empty() {
        return Err(GatewayError::BadRequest("name must not be empty".to_string()));
    }

    let created =
        group::create_group(state.db().pool(), &req.name, &req.description, user_id).await?;
    info!("User {} created group {} ({})", user_id, created.id, created.name);
    Ok(Json(created))
}

/// Groups the caller belongs to.
pub async fn list_mine(
    State(state): State<AppState>,
    Identity(user_id): Identity,
) -> Result<Json<Vec<Group>>> {
    Ok(Json(group::groups_of(state.db().pool(), user_id).await?))
}

#[derive(Deserialize)]
pub struct AddMemberRequest {
    pub user_id: UserId,
}

/// Enroll another user in a group. Members only.
pub async fn add_member(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Path(group_id): Path<GroupId>,
    Json(req): Json<AddMemberRequest>,
) -> Result<Json<serde_json::Value>> {
    if !group::is_member(state.db().pool(), group_id, caller).await? {
        return Err(GatewayError::Dispatch(
            dispatcher::DispatchError::NotAGroupMember {
                group_id,
                user_id: caller,
            },
        ));
    }

    group::add_member(state.db().pool(), group_id, req.user_id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// A group's message log. Members only.
pub async fn history(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Path(group_id): Path<GroupId>,
) -> Result<Json<Vec<GroupMessageView>>> {
    Ok(Json(
        state.dispatcher.fetch_group_history(group_id, user_id).await?,
    ))
}
