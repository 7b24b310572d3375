//! Failing engine implementation - every call errors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chat_core::{EngineError, TranslationEngine};

/// The failure shape a [`FailingEngine`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureKind {
    #[default]
    Network,
    Api,
    Malformed,
    Timeout,
}

/// An engine that fails every call.
///
/// Useful for exercising the translator's fail-open policy without a real
/// backend misbehaving on cue.
#[derive(Debug, Default)]
pub struct FailingEngine {
    kind: FailureKind,
    calls: Arc<AtomicUsize>,
}

impl FailingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(kind: FailureKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Total calls made so far across translate and detect.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn error(&self) -> EngineError {
        match self.kind {
            FailureKind::Network => EngineError::Network("connection refused".to_string()),
            FailureKind::Api => EngineError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            },
            FailureKind::Malformed => {
                EngineError::MalformedResponse("unexpected body".to_string())
            }
            FailureKind::Timeout => EngineError::Timeout,
        }
    }
}

#[async_trait]
impl TranslationEngine for FailingEngine {
    async fn translate(
        &self,
        _text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error())
    }

    async fn detect(&self, _text: &str) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error())
    }

    fn name(&self) -> &str {
        "FailingEngine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_fails() {
        let engine = FailingEngine::new();
        assert!(engine.translate("x", "fr", "en").await.is_err());
        assert!(engine.detect("x").await.is_err());
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_kinds() {
        let engine = FailingEngine::with_kind(FailureKind::Api);
        match engine.translate("x", "fr", "en").await {
            Err(EngineError::Api { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
