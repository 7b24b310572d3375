//! Route handlers for the gateway.

pub mod contacts;
pub mod groups;
pub mod health;
pub mod messages;
pub mod translate;
pub mod users;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Live event stream
        .route("/ws", get(ws::upgrade))
        // Users
        .route("/api/users", post(users::register).get(users::list))
        .route("/api/users/:id", get(users::profile))
        .route("/api/users/me/language", put(users::set_language))
        .route("/api/users/me/profile", put(users::set_profile))
        // Contacts
        .route("/api/contacts", post(contacts::add).get(contacts::list))
        // Messages
        .route("/api/messages", post(messages::send))
        .route("/api/messages/:contact_id", get(messages::history))
        .route("/api/messages/:message_id/read", post(messages::mark_read))
        .route("/api/messages/read-all", post(messages::mark_all_read))
        .route("/api/unread", get(messages::unread))
        // Groups
        .route("/api/groups", post(groups::create).get(groups::list_mine))
        .route("/api/groups/:id/members", post(groups::add_member))
        .route("/api/groups/:id/messages", get(groups::history))
        // Translation
        .route("/api/translate", post(translate::preview))
        .route("/api/translate/detect", post(translate::detect))
        .route("/api/translations", post(translate::add_custom))
        .route("/api/languages", get(translate::languages))
}
