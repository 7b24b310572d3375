//! Configuration for the translation pipeline.

use std::env;
use std::time::Duration;

use crate::error::TranslatorError;

/// Default deadline for a single engine call.
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 10;

/// Configuration for the translator and its HTTP engine.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Base URL of the translation API.
    pub api_url: String,

    /// Optional API key sent with each request.
    pub api_key: Option<String>,

    /// Language assumed when detection fails or a user has no preference.
    pub default_language: String,

    /// Deadline for a single engine call before failing open.
    pub engine_timeout: Duration,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            api_key: None,
            default_language: chat_core::DEFAULT_LANGUAGE.to_string(),
            engine_timeout: Duration::from_secs(DEFAULT_ENGINE_TIMEOUT_SECS),
        }
    }
}

impl TranslatorConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `TRANSLATE_API_URL` - Base URL of the translation API
    ///
    /// Optional environment variables:
    /// - `TRANSLATE_API_KEY` - API key for authentication
    /// - `TRANSLATE_DEFAULT_LANG` - Fallback language code (default: en)
    /// - `TRANSLATE_ENGINE_TIMEOUT_SECS` - Engine call deadline (default: 10)
    pub fn from_env() -> Result<Self, TranslatorError> {
        let api_url = env::var("TRANSLATE_API_URL")
            .map_err(|_| TranslatorError::Configuration("TRANSLATE_API_URL not set".to_string()))?;

        let api_key = env::var("TRANSLATE_API_KEY").ok().filter(|k| !k.is_empty());

        let default_language = env::var("TRANSLATE_DEFAULT_LANG")
            .unwrap_or_else(|_| chat_core::DEFAULT_LANGUAGE.to_string());

        let engine_timeout = env::var("TRANSLATE_ENGINE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_ENGINE_TIMEOUT_SECS));

        Ok(Self {
            api_url,
            api_key,
            default_language,
            engine_timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> TranslatorConfigBuilder {
        TranslatorConfigBuilder::default()
    }
}

/// Builder for TranslatorConfig.
#[derive(Debug, Default)]
pub struct TranslatorConfigBuilder {
    config: TranslatorConfig,
}

impl TranslatorConfigBuilder {
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn default_language(mut self, lang: impl Into<String>) -> Self {
        self.config.default_language = lang.into();
        self
    }

    pub fn engine_timeout(mut self, timeout: Duration) -> Self {
        self.config.engine_timeout = timeout;
        self
    }

    pub fn build(self) -> TranslatorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TranslatorConfig::default();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert!(config.api_key.is_none());
        assert_eq!(config.default_language, "en");
        assert_eq!(config.engine_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder() {
        let config = TranslatorConfig::builder()
            .api_url("https://translate.example.com")
            .api_key("secret")
            .default_language("fr")
            .engine_timeout(Duration::from_secs(3))
            .build();

        assert_eq!(config.api_url, "https://translate.example.com");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.default_language, "fr");
        assert_eq!(config.engine_timeout, Duration::from_secs(3));
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_translate_vars() {
            std::env::remove_var("TRANSLATE_API_URL");
            std::env::remove_var("TRANSLATE_API_KEY");
            std::env::remove_var("TRANSLATE_DEFAULT_LANG");
            std::env::remove_var("TRANSLATE_ENGINE_TIMEOUT_SECS");
        }

        // Missing API URL should error.
        clear_all_translate_vars();
        let result = TranslatorConfig::from_env();
        assert!(matches!(result, Err(TranslatorError::Configuration(_))));

        // Only the URL set: defaults used.
        clear_all_translate_vars();
        std::env::set_var("TRANSLATE_API_URL", "http://translate.local");
        let config = TranslatorConfig::from_env().unwrap();
        assert_eq!(config.api_url, "http://translate.local");
        assert!(config.api_key.is_none());
        assert_eq!(config.default_language, "en");
        assert_eq!(config.engine_timeout, Duration::from_secs(10));

        // All vars set.
        std::env::set_var("TRANSLATE_API_KEY", "k123");
        std::env::set_var("TRANSLATE_DEFAULT_LANG", "es");
        std::env::set_var("TRANSLATE_ENGINE_TIMEOUT_SECS", "3");
        let config = TranslatorConfig::from_env().unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k123"));
        assert_eq!(config.default_language, "es");
        assert_eq!(config.engine_timeout, Duration::from_secs(3));

        clear_all_translate_vars();
    }
}
