//! Delayed engine implementation - wraps another engine with artificial delay.

use std::time::Duration;

use chat_core::{async_trait, EngineError, TranslationEngine};
use tokio::time::sleep;

/// An engine that wraps another engine and adds artificial delay.
///
/// Useful for testing timeout handling and simulating backend latency.
pub struct DelayedEngine<E: TranslationEngine> {
    inner: E,
    delay: Duration,
}

impl<E: TranslationEngine> DelayedEngine<E> {
    pub fn new(inner: E, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create an engine with a delay in milliseconds.
    pub fn with_millis(inner: E, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<E: TranslationEngine> TranslationEngine for DelayedEngine<E> {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, EngineError> {
        sleep(self.delay).await;
        self.inner.translate(text, source, target).await
    }

    async fn detect(&self, text: &str) -> Result<String, EngineError> {
        sleep(self.delay).await;
        self.inner.detect(text).await
    }

    fn name(&self) -> &str {
        "DelayedEngine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EchoEngine;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delay_applies() {
        let engine = DelayedEngine::with_millis(EchoEngine::new(), 50);

        let start = Instant::now();
        let out = engine.translate("hola", "es", "en").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(out, "[en] hola");
    }

    #[tokio::test]
    async fn test_engine_name() {
        assert_eq!(
            DelayedEngine::with_millis(EchoEngine::new(), 0).name(),
            "DelayedEngine"
        );
    }
}
