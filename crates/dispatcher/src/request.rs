//! Dispatch request and acknowledgement types.

use chat_core::{GroupId, MessageBody, MessageId, UserId};
use serde::{Deserialize, Serialize};

/// Where a message is headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    User(UserId),
    Group(GroupId),
}

/// A message submitted for dispatch.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub sender_id: UserId,
    pub target: Target,
    pub body: MessageBody,
    /// Source language override. When absent, the sender's preferred
    /// language is assumed.
    pub language_override: Option<String>,
}

impl SendRequest {
    /// A plain text message to another user.
    pub fn text(sender_id: UserId, receiver_id: UserId, text: impl Into<String>) -> Self {
        Self {
            sender_id,
            target: Target::User(receiver_id),
            body: MessageBody::Text(text.into()),
            language_override: None,
        }
    }

    /// A plain text message to a group.
    pub fn group_text(sender_id: UserId, group_id: GroupId, text: impl Into<String>) -> Self {
        Self {
            sender_id,
            target: Target::Group(group_id),
            body: MessageBody::Text(text.into()),
            language_override: None,
        }
    }
}

/// Returned to the sender once a message is durably stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendAck {
    pub message_id: MessageId,
    pub timestamp_ms: i64,
    /// For direct messages: the caption in the receiver's language. For
    /// group messages: the original caption.
    pub translated_content: String,
}
