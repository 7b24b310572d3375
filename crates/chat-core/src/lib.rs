//! Core types and traits for the translating messenger.
//!
//! This crate provides the shared vocabulary used by every other crate in the
//! workspace:
//!
//! - [`MessageBody`] - the tagged union of message payload kinds
//! - [`ChatEvent`] - live push events delivered to connected sessions
//! - [`TranslationEngine`] - the trait external translation backends implement
//! - [`EngineError`] - error type for engine operations
//! - The supported-language table and id aliases
//!
//! # Example
//!
//! ```rust
//! use chat_core::{EngineError, TranslationEngine};
//! use async_trait::async_trait;
//!
//! struct MyEngine;
//!
//! #[async_trait]
//! impl TranslationEngine for MyEngine {
//!     async fn translate(&self, text: &str, _source: &str, target: &str)
//!         -> Result<String, EngineError> {
//!         Ok(format!("[{}] {}", target, text))
//!     }
//!
//!     async fn detect(&self, _text: &str) -> Result<String, EngineError> {
//!         Ok("en".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyEngine"
//!     }
//! }
//! ```

mod body;
mod engine;
mod event;
mod language;

pub use body::{ContactCard, FileInfo, MessageBody, PayloadKind};
pub use engine::{EngineError, TranslationEngine};
pub use event::{ChatEvent, MessageEvent, SenderInfo};
pub use language::{is_supported, language_name, DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};

// Re-export async_trait for engine implementors
pub use async_trait::async_trait;

/// User identifier (SQLite rowid).
pub type UserId = i64;

/// Message identifier (SQLite rowid).
pub type MessageId = i64;

/// Group identifier (SQLite rowid).
pub type GroupId = i64;

/// Current time as UTC epoch milliseconds.
///
/// All persisted timestamps use this representation so the
/// `(timestamp_ms, id)` composite order is a plain integer sort.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
