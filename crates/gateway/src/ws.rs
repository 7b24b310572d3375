//! WebSocket endpoint streaming live chat events.
//!
//! On upgrade the caller's session joins the presence registry; every
//! `ChatEvent` addressed to them arrives as one JSON text frame. Inbound
//! frames carry lightweight client actions (typing, read receipts). Closing
//! the socket leaves the session and, when it was the last one, flips the
//! user offline.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use chat_core::{MessageId, UserId};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::identity::Identity;
use crate::state::AppState;

/// Actions a client may send over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ClientFrame {
    Typing {
        recipient_id: UserId,
        is_typing: bool,
    },
    ReadMessage {
        message_id: MessageId,
    },
    ReadAll {
        contact_id: UserId,
    },
}

/// Upgrade to a WebSocket session for the identified user.
pub async fn upgrade(
    ws: WebSocketUpgrade,
    Identity(user_id): Identity,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle(socket, state, user_id))
}

async fn handle(socket: WebSocket, state: AppState, user_id: UserId) {
    let mut session = match state.dispatcher.connect(user_id).await {
        Ok(session) => session,
        Err(e) => {
            warn!("Rejecting socket for user {}: {}", user_id, e);
            return;
        }
    };
    let session_id = session.id;
    debug!("Socket open for user {} ({:?})", user_id, session_id);

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            event = session.events.recv() => {
                let Some(event) = event else { break };
                let frame = match serde_json::to_string(&event) {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!("Failed to encode event {}: {}", event.name(), e);
                        continue;
                    }
                };
                if sink.send(Message::Text(frame)).await.is_err() {
                    break;
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(&state, user_id, &text).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    if let Err(e) = state.dispatcher.disconnect(user_id, session_id).await {
        warn!("Disconnect of user {} failed: {}", user_id, e);
    }
    debug!("Socket closed for user {} ({:?})", user_id, session_id);
}

async fn handle_frame(state: &AppState, user_id: UserId, text: &str) {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!("Ignoring malformed frame from user {}: {}", user_id, e);
            return;
        }
    };

    match frame {
        ClientFrame::Typing {
            recipient_id,
            is_typing,
        } => {
            state.dispatcher.typing(user_id, recipient_id, is_typing).await;
        }
        ClientFrame::ReadMessage { message_id } => {
            if let Err(e) = state.dispatcher.mark_read(message_id, user_id).await {
                debug!("read_message from user {} rejected: {}", user_id, e);
            }
        }
        ClientFrame::ReadAll { contact_id } => {
            if let Err(e) = state.dispatcher.mark_all_read(user_id, contact_id).await {
                warn!("read_all from user {} failed: {}", user_id, e);
            }
        }
    }
}
