//! Read-side views returned by history queries.

use std::collections::HashMap;

use chat_core::{GroupId, MessageBody, MessageId, UserId};
use database::{GroupMessage, MessageRow};
use serde::Serialize;

use crate::error::DispatchError;

/// A direct message with its payload reconstructed from storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub translated_content: String,
    pub original_language: String,
    pub translated_language: String,
    pub timestamp_ms: i64,
    pub is_read: bool,
    pub is_delivered: bool,
    pub kind: &'static str,
    pub body: MessageBody,
}

impl MessageView {
    pub fn from_row(row: MessageRow) -> Result<Self, DispatchError> {
        let body = row.body()?;
        Ok(Self {
            id: row.id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            content: row.content,
            translated_content: row.translated_content,
            original_language: row.original_language,
            translated_language: row.translated_language,
            timestamp_ms: row.timestamp_ms,
            is_read: row.is_read,
            is_delivered: row.is_delivered,
            kind: body.kind().as_str(),
            body,
        })
    }
}

/// A group message with its per-language translations decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMessageView {
    pub id: MessageId,
    pub group_id: GroupId,
    pub sender_id: UserId,
    pub content: String,
    pub translations: HashMap<String, String>,
    pub timestamp_ms: i64,
}

impl GroupMessageView {
    pub fn from_row(row: GroupMessage) -> Result<Self, DispatchError> {
        let translations: HashMap<String, String> = serde_json::from_str(&row.translated_contents)
            .map_err(|e| {
                DispatchError::Internal(format!(
                    "bad translations blob on group message {}: {}",
                    row.id, e
                ))
            })?;
        Ok(Self {
            id: row.id,
            group_id: row.group_id,
            sender_id: row.sender_id,
            content: row.content,
            translations,
            timestamp_ms: row.timestamp_ms,
        })
    }

    /// The caption in `language`, falling back to the original.
    pub fn content_for(&self, language: &str) -> &str {
        self.translations
            .get(language)
            .map(String::as_str)
            .unwrap_or(&self.content)
    }
}
