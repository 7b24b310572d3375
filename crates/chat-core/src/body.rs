//! Message payload kinds.

use serde::{Deserialize, Serialize};

/// Metadata for a file payload. The blob itself lives in external storage;
/// only its URL travels through the messaging core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// URL returned by the blob store.
    pub url: String,
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// Coarse file type ("images", "documents", ...).
    pub file_type: String,
}

/// A shared contact card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactCard {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Discriminant for a persisted message, stored as a TEXT column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Text,
    File,
    MultipleFiles,
    Voice,
    Location,
    ContactCard,
}

impl PayloadKind {
    /// Column value for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::File => "file",
            Self::MultipleFiles => "multiple_files",
            Self::Voice => "voice",
            Self::Location => "location",
            Self::ContactCard => "contact_card",
        }
    }

    /// Parse a column value back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "file" => Some(Self::File),
            "multiple_files" => Some(Self::MultipleFiles),
            "voice" => Some(Self::Voice),
            "location" => Some(Self::Location),
            "contact_card" => Some(Self::ContactCard),
            _ => None,
        }
    }
}

/// The payload of an outbound message.
///
/// Every kind shares the same translate/persist/notify pipeline; they differ
/// in which fields are populated and in the human-readable caption that gets
/// translated for the recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageBody {
    /// Plain text; the text itself is the caption.
    Text(String),
    /// A single uploaded file.
    File(FileInfo),
    /// Several uploads batched into one message.
    MultipleFiles(Vec<FileInfo>),
    /// A recorded voice clip.
    Voice { file: FileInfo, duration_secs: u32 },
    /// Geographic coordinates.
    Location { latitude: f64, longitude: f64 },
    /// A shared contact card.
    ContactCard(ContactCard),
}

impl MessageBody {
    /// The persisted kind discriminant.
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Text(_) => PayloadKind::Text,
            Self::File(_) => PayloadKind::File,
            Self::MultipleFiles(_) => PayloadKind::MultipleFiles,
            Self::Voice { .. } => PayloadKind::Voice,
            Self::Location { .. } => PayloadKind::Location,
            Self::ContactCard(_) => PayloadKind::ContactCard,
        }
    }

    /// The human-readable caption for this payload.
    ///
    /// This is the string that gets translated for the recipient. File names
    /// inside a multi-file batch are not translated individually; only this
    /// composite caption is.
    pub fn caption(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::File(file) => format!("File: {}", file.name),
            Self::MultipleFiles(files) => {
                let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
                format!("{} files: {}", files.len(), names.join(", "))
            }
            Self::Voice { .. } => "Voice message".to_string(),
            Self::Location { .. } => "My location".to_string(),
            Self::ContactCard(card) => format!("Contact: {}", card.name),
        }
    }

    /// Whether the payload carries nothing to deliver.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::MultipleFiles(files) => files.is_empty(),
            Self::File(_) | Self::Voice { .. } | Self::Location { .. } => false,
            Self::ContactCard(card) => card.name.trim().is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> FileInfo {
        FileInfo {
            url: format!("/uploads/{}", name),
            name: name.to_string(),
            size: 42,
            file_type: "documents".to_string(),
        }
    }

    #[test]
    fn test_text_caption_is_content() {
        let body = MessageBody::Text("Bonjour".to_string());
        assert_eq!(body.caption(), "Bonjour");
        assert_eq!(body.kind(), PayloadKind::Text);
    }

    #[test]
    fn test_file_caption() {
        let body = MessageBody::File(file("report.pdf"));
        assert_eq!(body.caption(), "File: report.pdf");
    }

    #[test]
    fn test_multiple_files_caption() {
        let body = MessageBody::MultipleFiles(vec![file("a.png"), file("b.png")]);
        assert_eq!(body.caption(), "2 files: a.png, b.png");
        assert_eq!(body.kind(), PayloadKind::MultipleFiles);
    }

    #[test]
    fn test_location_caption() {
        let body = MessageBody::Location {
            latitude: 48.85,
            longitude: 2.35,
        };
        assert_eq!(body.caption(), "My location");
    }

    #[test]
    fn test_empty_checks() {
        assert!(MessageBody::Text("   ".to_string()).is_empty());
        assert!(MessageBody::MultipleFiles(vec![]).is_empty());
        assert!(!MessageBody::File(file("x.txt")).is_empty());
        assert!(!MessageBody::Location {
            latitude: 0.0,
            longitude: 0.0
        }
        .is_empty());
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            PayloadKind::Text,
            PayloadKind::File,
            PayloadKind::MultipleFiles,
            PayloadKind::Voice,
            PayloadKind::Location,
            PayloadKind::ContactCard,
        ] {
            assert_eq!(PayloadKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PayloadKind::parse("bogus"), None);
    }
}
