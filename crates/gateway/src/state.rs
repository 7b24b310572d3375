//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use dispatcher::Dispatcher;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Message dispatcher; owns the translator and the presence registry.
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Create new application state.
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// The underlying database, for read-side routes.
    pub fn db(&self) -> &Database {
        self.dispatcher.db()
    }
}
