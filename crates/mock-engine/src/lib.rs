//! Mock translation engine implementations for the message pipeline.
//!
//! This crate provides mock implementations of the `TranslationEngine` trait
//! for testing:
//! - `EchoEngine` - Tags text with the target language, counts calls
//! - `FailingEngine` - Always errors, for exercising fail-open paths
//! - `DelayedEngine` - Wraps another engine with artificial delay
//!
//! For production translation, use the `translator` crate's `HttpEngine`.
//!
//! # Example
//!
//! ```rust
//! use mock_engine::EchoEngine;
//! use chat_core::TranslationEngine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chat_core::EngineError> {
//!     let engine = EchoEngine::new();
//!     let out = engine.translate("Bonjour", "fr", "en").await?;
//!     assert_eq!(out, "[en] Bonjour");
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod failing;

pub use chat_core::{async_trait, EngineError, TranslationEngine};

pub use delayed::DelayedEngine;
pub use echo::EchoEngine;
pub use failing::FailingEngine;
