//! Echo engine implementation - tags text with the target language.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chat_core::{EngineError, TranslationEngine};

/// An engine that "translates" by tagging text with the target language.
///
/// `translate("Bonjour", "fr", "en")` yields `"[en] Bonjour"`, which makes it
/// easy to assert which target language a pipeline requested. The call counter
/// lets tests verify cache hits and identity short-circuits never reach the
/// engine.
#[derive(Debug, Default)]
pub struct EchoEngine {
    translate_calls: Arc<AtomicUsize>,
    detect_calls: Arc<AtomicUsize>,
    detect_result: Option<String>,
}

impl EchoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine whose `detect` always reports the given language.
    pub fn detecting(language: impl Into<String>) -> Self {
        Self {
            detect_result: Some(language.into()),
            ..Self::default()
        }
    }

    /// Number of `translate` calls made so far.
    pub fn translate_calls(&self) -> usize {
        self.translate_calls.load(Ordering::SeqCst)
    }

    /// Number of `detect` calls made so far.
    pub fn detect_calls(&self) -> usize {
        self.detect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationEngine for EchoEngine {
    async fn translate(
        &self,
        text: &str,
        _source: &str,
        target: &str,
    ) -> Result<String, EngineError> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("[{}] {}", target, text))
    }

    async fn detect(&self, _text: &str) -> Result<String, EngineError> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .detect_result
            .clone()
            .unwrap_or_else(|| "en".to_string()))
    }

    fn name(&self) -> &str {
        "EchoEngine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_translate_tags_target() {
        let engine = EchoEngine::new();
        let out = engine.translate("Bonjour", "fr", "en").await.unwrap();
        assert_eq!(out, "[en] Bonjour");
        assert_eq!(engine.translate_calls(), 1);
    }

    #[tokio::test]
    async fn test_detecting_override() {
        let engine = EchoEngine::detecting("fr");
        assert_eq!(engine.detect("Bonjour").await.unwrap(), "fr");
        assert_eq!(engine.detect_calls(), 1);
    }

    #[tokio::test]
    async fn test_engine_name() {
        assert_eq!(EchoEngine::new().name(), "EchoEngine");
    }
}
