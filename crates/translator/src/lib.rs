//! Translation pipeline for the messenger.
//!
//! Wraps an external `TranslationEngine` with a persistent custom-translation
//! cache and a fail-open policy: when the engine is unreachable, messages are
//! delivered untranslated rather than dropped.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use translator::{HttpEngine, Translator, TranslatorConfig};
//! use database::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:messenger.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let config = TranslatorConfig::from_env()?;
//!     let engine = Arc::new(HttpEngine::new(&config)?);
//!     let translator = Translator::new(db, engine, config);
//!
//!     let english = translator.translate("Bonjour", "fr", "en").await;
//!     println!("{}", english);
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod error;
mod http_engine;
mod translator;

pub use chat_core::{EngineError, TranslationEngine};

pub use config::{TranslatorConfig, TranslatorConfigBuilder, DEFAULT_ENGINE_TIMEOUT_SECS};
pub use error::TranslatorError;
pub use http_engine::HttpEngine;
pub use translator::Translator;
