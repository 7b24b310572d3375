//! Translation engine trait and error type.

use async_trait::async_trait;
use thiserror::Error;

/// Errors an external translation engine can produce.
///
/// All of these are absorbed by the translator's fail-open policy; they exist
/// so the failure can be logged with a meaningful cause.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Network-level failure reaching the engine.
    #[error("network error: {0}")]
    Network(String),

    /// The engine returned a non-success status.
    #[error("engine error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The engine responded with a body we could not parse.
    #[error("malformed engine response: {0}")]
    MalformedResponse(String),

    /// The engine did not answer within the configured deadline.
    #[error("engine call timed out")]
    Timeout,
}

/// An external translation backend.
///
/// Implementations are expected to be stateless per call and safe to share
/// across tasks behind an `Arc`.
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Translate `text` from `source` to `target`.
    async fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, EngineError>;

    /// Best-effort language detection for `text`, returning a language code.
    async fn detect(&self, text: &str) -> Result<String, EngineError>;

    /// Engine name for logging.
    fn name(&self) -> &str;
}
