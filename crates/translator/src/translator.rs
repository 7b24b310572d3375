//! The translation pipeline: cache lookup, engine call, fail-open fallback.

use std::sync::Arc;

use chat_core::TranslationEngine;
use database::{translation, Database};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::TranslatorConfig;
use crate::error::TranslatorError;

/// The translation pipeline.
///
/// Resolution order for a translate call:
/// 1. Identity: source equals target, or the text is blank. Returned as-is,
///    no engine call, no cache write.
/// 2. The persistent custom-translation cache, which also holds curated
///    entries added by hand.
/// 3. The external engine, under the configured deadline. Successful results
///    are written back to the cache.
///
/// Any engine failure fails open: the caller gets the original text back and
/// the failure is logged. A message is never dropped because translation was
/// unavailable.
pub struct Translator {
    db: Database,
    engine: Arc<dyn TranslationEngine>,
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(db: Database, engine: Arc<dyn TranslationEngine>, config: TranslatorConfig) -> Self {
        Self { db, engine, config }
    }

    /// The fallback language used when detection fails.
    pub fn default_language(&self) -> &str {
        &self.config.default_language
    }

    /// Translate `text` from `source` to `target`, failing open to the
    /// original text when the engine is unavailable.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> String {
        if source == target || text.trim().is_empty() {
            return text.to_string();
        }

        match translation::get_translation(self.db.pool(), source, target, text).await {
            Ok(Some(cached)) => {
                debug!("Cache hit for {} -> {}", source, target);
                return cached;
            }
            Ok(None) => {}
            Err(e) => {
                // A broken cache must not block delivery; fall through to the engine.
                warn!("Translation cache lookup failed: {}", e);
            }
        }

        let translated = match timeout(
            self.config.engine_timeout,
            self.engine.translate(text, source, target),
        )
        .await
        {
            Ok(Ok(translated)) => translated,
            Ok(Err(e)) => {
                warn!(
                    "Engine {} failed ({} -> {}): {}; delivering original text",
                    self.engine.name(),
                    source,
                    target,
                    e
                );
                return text.to_string();
            }
            Err(_) => {
                warn!(
                    "Engine {} timed out ({} -> {}); delivering original text",
                    self.engine.name(),
                    source,
                    target
                );
                return text.to_string();
            }
        };

        if let Err(e) =
            translation::upsert_translation(self.db.pool(), source, target, text, &translated)
                .await
        {
            warn!("Failed to cache translation: {}", e);
        }

        translated
    }

    /// Best-effort language detection. Falls back to the default language
    /// when the engine fails, times out, or reports an unsupported code.
    pub async fn detect_language(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return self.config.default_language.clone();
        }

        match timeout(self.config.engine_timeout, self.engine.detect(text)).await {
            Ok(Ok(lang)) if chat_core::is_supported(&lang) => lang,
            Ok(Ok(lang)) => {
                warn!(
                    "Engine reported unsupported language {:?}; assuming {}",
                    lang, self.config.default_language
                );
                self.config.default_language.clone()
            }
            Ok(Err(e)) => {
                warn!(
                    "Language detection failed: {}; assuming {}",
                    e, self.config.default_language
                );
                self.config.default_language.clone()
            }
            Err(_) => {
                warn!(
                    "Language detection timed out; assuming {}",
                    self.config.default_language
                );
                self.config.default_language.clone()
            }
        }
    }

    /// Add a curated translation to the cache, overriding whatever the engine
    /// would produce for this text. Returns `Ok(false)` when any field is
    /// blank, without touching the cache.
    pub async fn add_custom_translation(
        &self,
        source: &str,
        target: &str,
        source_text: &str,
        translated_text: &str,
    ) -> Result<bool, TranslatorError> {
        if source.trim().is_empty()
            || target.trim().is_empty()
            || source_text.trim().is_empty()
            || translated_text.trim().is_empty()
        {
            return Ok(false);
        }

        translation::upsert_translation(self.db.pool(), source, target, source_text, translated_text)
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_engine::{EchoEngine, FailingEngine};
    use std::time::Duration;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn translator(db: Database, engine: Arc<dyn TranslationEngine>) -> Translator {
        Translator::new(db, engine, TranslatorConfig::default())
    }

    #[tokio::test]
    async fn test_identity_skips_engine() {
        let engine = Arc::new(EchoEngine::new());
        let t = translator(test_db().await, engine.clone());

        assert_eq!(t.translate("Bonjour", "fr", "fr").await, "Bonjour");
        assert_eq!(t.translate("   ", "fr", "en").await, "   ");
        assert_eq!(engine.translate_calls(), 0);
    }

    #[tokio::test]
    async fn test_engine_result_is_cached() {
        let engine = Arc::new(EchoEngine::new());
        let t = translator(test_db().await, engine.clone());

        assert_eq!(t.translate("Bonjour", "fr", "en").await, "[en] Bonjour");
        assert_eq!(t.translate("Bonjour", "fr", "en").await, "[en] Bonjour");
        // Second call must be served from the cache.
        assert_eq!(engine.translate_calls(), 1);
    }

    #[tokio::test]
    async fn test_fail_open_returns_original() {
        let t = translator(test_db().await, Arc::new(FailingEngine::new()));
        assert_eq!(t.translate("Bonjour", "fr", "en").await, "Bonjour");
    }

    #[tokio::test]
    async fn test_timeout_fails_open() {
        let engine = mock_engine::DelayedEngine::with_millis(EchoEngine::new(), 200);
        let config = TranslatorConfig::builder()
            .engine_timeout(Duration::from_millis(20))
            .build();
        let t = Translator::new(test_db().await, Arc::new(engine), config);

        assert_eq!(t.translate("Bonjour", "fr", "en").await, "Bonjour");
    }

    #[tokio::test]
    async fn test_custom_translation_preempts_engine() {
        let engine = Arc::new(EchoEngine::new());
        let t = translator(test_db().await, engine.clone());

        assert!(t
            .add_custom_translation("fr", "en", "Bonjour", "Hello there")
            .await
            .unwrap());
        assert_eq!(t.translate("Bonjour", "fr", "en").await, "Hello there");
        assert_eq!(engine.translate_calls(), 0);
    }

    #[tokio::test]
    async fn test_custom_translation_rejects_blank_input() {
        let t = translator(test_db().await, Arc::new(EchoEngine::new()));
        assert!(!t.add_custom_translation("fr", "en", "", "Hello").await.unwrap());
        assert!(!t.add_custom_translation("fr", "en", "Bonjour", "  ").await.unwrap());
    }

    #[tokio::test]
    async fn test_detect_fails_open_to_default() {
        let t = translator(test_db().await, Arc::new(FailingEngine::new()));
        assert_eq!(t.detect_language("Bonjour").await, "en");
    }

    #[tokio::test]
    async fn test_detect_rejects_unsupported_code() {
        let t = translator(test_db().await, Arc::new(EchoEngine::detecting("xx")));
        assert_eq!(t.detect_language("mystery").await, "en");

        let t = translator(test_db().await, Arc::new(EchoEngine::detecting("fr")));
        assert_eq!(t.detect_language("Bonjour").await, "fr");
    }
}
