//! Message send, history, and read-state routes.

use axum::extract::{Path, State};
use axum::Json;
use chat_core::{MessageBody, MessageId, UserId};
use dispatcher::{MessageView, SendAck, SendRequest, Target};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::identity::Identity;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SendMessageRequest {
    /// Exactly one of `receiver_id` and `group_id` must be set.
    pub receiver_id: Option<UserId>,
    pub group_id: Option<i64>,
    pub body: MessageBody,
    pub language: Option<String>,
}

/// Dispatch a message to a user or a group.
pub async fn send(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<SendAck>> {
    let target = match (req.receiver_id, req.group_id) {
        (Some(receiver_id), None) => Target::User(receiver_id),
        (None, Some(group_id)) => Target::Group(group_id),
        _ => {
            return Err(crate::error::GatewayError::BadRequest(
                "exactly one of receiver_id and group_id must be set".to_string(),
            ))
        }
    };

    let ack = state
        .dispatcher
        .send(SendRequest {
            sender_id: user_id,
            target,
            body: req.body,
            language_override: req.language,
        })
        .await?;
    Ok(Json(ack))
}

/// The caller's conversation with one contact, oldest first.
pub async fn history(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Path(contact_id): Path<UserId>,
) -> Result<Json<Vec<MessageView>>> {
    Ok(Json(state.dispatcher.fetch_history(user_id, contact_id).await?))
}

/// Mark one received message as read.
pub async fn mark_read(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Path(message_id): Path<MessageId>,
) -> Result<Json<serde_json::Value>> {
    state.dispatcher.mark_read(message_id, user_id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct MarkAllReadRequest {
    pub contact_id: UserId,
}

#[derive(Serialize)]
pub struct MarkAllReadResponse {
    pub count: u64,
}

/// Mark every unread message from one contact as read.
pub async fn mark_all_read(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(req): Json<MarkAllReadRequest>,
) -> Result<Json<MarkAllReadResponse>> {
    let count = state.dispatcher.mark_all_read(user_id, req.contact_id).await?;
    Ok(Json(MarkAllReadResponse { count }))
}

#[derive(Serialize)]
pub struct UnreadEntry {
    pub sender_id: UserId,
    pub count: i64,
}

/// Unread counts per sender for the caller.
pub async fn unread(
    State(state): State<AppState>,
    Identity(user_id): Identity,
) -> Result<Json<Vec<UnreadEntry>>> {
    let counts = state.dispatcher.unread_counts(user_id).await?;
    Ok(Json(
        counts
            .into_iter()
            .map(|(sender_id, count)| UnreadEntry { sender_id, count })
            .collect(),
    ))
}
