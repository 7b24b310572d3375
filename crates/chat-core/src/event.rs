//! Live push events delivered to connected sessions.

use serde::{Deserialize, Serialize};

use crate::body::{ContactCard, FileInfo, PayloadKind};
use crate::{GroupId, MessageId, UserId};

/// Sender metadata attached to message events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderInfo {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
}

/// The payload shared by every `new_*` message event.
///
/// Kind-specific fields are optional and only present for the matching event
/// name; `translated_content` is the caption in the receiver's language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEvent {
    pub message_id: MessageId,
    pub sender: SenderInfo,
    pub receiver_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    pub content: String,
    pub translated_content: String,
    pub timestamp_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactCard>,
}

impl MessageEvent {
    /// A bare event with no kind-specific fields populated.
    pub fn new(
        message_id: MessageId,
        sender: SenderInfo,
        receiver_id: UserId,
        content: impl Into<String>,
        translated_content: impl Into<String>,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            message_id,
            sender,
            receiver_id,
            group_id: None,
            content: content.into(),
            translated_content: translated_content.into(),
            timestamp_ms,
            file: None,
            files: None,
            duration_secs: None,
            latitude: None,
            longitude: None,
            contact: None,
        }
    }
}

/// A named live event, serialized as `{"event": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ChatEvent {
    NewMessage(MessageEvent),
    NewFileMessage(MessageEvent),
    NewMultipleFiles(MessageEvent),
    NewVoiceMessage(MessageEvent),
    NewLocationMessage(MessageEvent),
    NewContactMessage(MessageEvent),
    UserStatus {
        user_id: UserId,
        online: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_line: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        last_seen_ms: Option<i64>,
    },
    TypingStatus {
        user_id: UserId,
        is_typing: bool,
    },
    MessageRead {
        message_id: MessageId,
        reader_id: UserId,
    },
    MessagesRead {
        contact_id: UserId,
        reader_id: UserId,
        count: u64,
    },
}

impl ChatEvent {
    /// Wrap a message event under the name matching its payload kind.
    pub fn for_kind(kind: PayloadKind, event: MessageEvent) -> Self {
        match kind {
            PayloadKind::Text => Self::NewMessage(event),
            PayloadKind::File => Self::NewFileMessage(event),
            PayloadKind::MultipleFiles => Self::NewMultipleFiles(event),
            PayloadKind::Voice => Self::NewVoiceMessage(event),
            PayloadKind::Location => Self::NewLocationMessage(event),
            PayloadKind::ContactCard => Self::NewContactMessage(event),
        }
    }

    /// The wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "new_message",
            Self::NewFileMessage(_) => "new_file_message",
            Self::NewMultipleFiles(_) => "new_multiple_files",
            Self::NewVoiceMessage(_) => "new_voice_message",
            Self::NewLocationMessage(_) => "new_location_message",
            Self::NewContactMessage(_) => "new_contact_message",
            Self::UserStatus { .. } => "user_status",
            Self::TypingStatus { .. } => "typing_status",
            Self::MessageRead { .. } => "message_read",
            Self::MessagesRead { .. } => "messages_read",
        }
    }
}
