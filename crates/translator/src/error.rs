//! Translator error type.

use thiserror::Error;

/// Errors the translation pipeline surfaces to callers.
///
/// Engine failures never appear here: the pipeline fails open to the original
/// text instead. What remains is configuration and storage.
#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("storage error: {0}")]
    Storage(#[from] database::DatabaseError),
}
