//! Database models.

use chat_core::{ContactCard, FileInfo, GroupId, MessageBody, MessageId, PayloadKind, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::DatabaseError;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    /// Display name, unique.
    pub name: String,
    /// Preferred language code (e.g. "fr", "en").
    pub language: String,
    /// Avatar file name or URL.
    pub avatar: String,
    /// Free-form status line shown to contacts.
    pub status_line: String,
    /// Whether at least one presence session is live. Flipped only through
    /// presence join/leave.
    pub is_online: bool,
    /// When the last session left, epoch ms.
    pub last_seen_ms: Option<i64>,
    pub created_at_ms: i64,
}

/// Fields required to register a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub language: String,
    pub avatar: String,
    pub status_line: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            avatar: "default.png".to_string(),
            status_line: String::new(),
        }
    }
}

/// A persisted direct message. Kind-specific columns are nullable and only
/// populated for the matching kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MessageRow {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    /// Original caption in the sender's language.
    pub content: String,
    /// Caption in the receiver's language; equals `content` when the
    /// languages match.
    pub translated_content: String,
    pub original_language: String,
    pub translated_language: String,
    pub timestamp_ms: i64,
    pub is_read: bool,
    pub is_delivered: bool,
    pub kind: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub duration_secs: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_info: Option<String>,
}

impl MessageRow {
    /// Reconstruct the typed payload from the flattened columns.
    pub fn body(&self) -> Result<MessageBody, DatabaseError> {
        let corrupt = |detail: &str| DatabaseError::Corrupt {
            entity: "Message",
            id: self.id.to_string(),
            detail: detail.to_string(),
        };

        let kind = PayloadKind::parse(&self.kind)
            .ok_or_else(|| corrupt(&format!("unknown kind '{}'", self.kind)))?;

        match kind {
            PayloadKind::Text => Ok(MessageBody::Text(self.content.clone())),
            PayloadKind::File => Ok(MessageBody::File(self.file_info()?)),
            PayloadKind::MultipleFiles => {
                let manifest = self
                    .file_url
                    .as_deref()
                    .ok_or_else(|| corrupt("missing file manifest"))?;
                let files: Vec<FileInfo> = serde_json::from_str(manifest)
                    .map_err(|e| corrupt(&format!("bad file manifest: {}", e)))?;
                Ok(MessageBody::MultipleFiles(files))
            }
            PayloadKind::Voice => Ok(MessageBody::Voice {
                file: self.file_info()?,
                duration_secs: self.duration_secs.unwrap_or(0) as u32,
            }),
            PayloadKind::Location => Ok(MessageBody::Location {
                latitude: self.latitude.ok_or_else(|| corrupt("missing latitude"))?,
                longitude: self.longitude.ok_or_else(|| corrupt("missing longitude"))?,
            }),
            PayloadKind::ContactCard => {
                let info = self
                    .contact_info
                    .as_deref()
                    .ok_or_else(|| corrupt("missing contact info"))?;
                let card: ContactCard = serde_json::from_str(info)
                    .map_err(|e| corrupt(&format!("bad contact info: {}", e)))?;
                Ok(MessageBody::ContactCard(card))
            }
        }
    }

    fn file_info(&self) -> Result<FileInfo, DatabaseError> {
        match (&self.file_url, &self.file_name) {
            (Some(url), Some(name)) => Ok(FileInfo {
                url: url.clone(),
                name: name.clone(),
                size: self.file_size.unwrap_or(0),
                file_type: self.file_type.clone().unwrap_or_default(),
            }),
            _ => Err(DatabaseError::Corrupt {
                entity: "Message",
                id: self.id.to_string(),
                detail: "missing file columns".to_string(),
            }),
        }
    }
}

/// Fields required to append a direct message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub translated_content: String,
    pub original_language: String,
    pub translated_language: String,
    /// Server-side timestamp is assigned when absent.
    pub timestamp_ms: Option<i64>,
    pub is_delivered: bool,
    pub body: MessageBody,
}

/// A chat group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: String,
    pub created_by: UserId,
    pub created_at_ms: i64,
}

/// A group membership record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GroupMember {
    pub group_id: GroupId,
    pub user_id: UserId,
    pub is_admin: bool,
    pub joined_at_ms: i64,
}

/// A persisted group message. `translated_contents` is a JSON map from
/// language code to the caption translated into that language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GroupMessage {
    pub id: MessageId,
    pub group_id: GroupId,
    pub sender_id: UserId,
    pub content: String,
    pub translated_contents: String,
    pub timestamp_ms: i64,
}

/// Fields required to append a group message.
#[derive(Debug, Clone)]
pub struct NewGroupMessage {
    pub group_id: GroupId,
    pub sender_id: UserId,
    pub content: String,
    /// JSON map `{language -> translation}`.
    pub translated_contents: String,
    pub timestamp_ms: Option<i64>,
}

/// A curated or engine-produced translation cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TranslationEntry {
    pub source_lang: String,
    pub target_lang: String,
    pub source_text: String,
    pub translated_text: String,
    pub updated_at_ms: i64,
}
