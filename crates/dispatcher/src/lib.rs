//! Message dispatcher for the translating messenger.
//!
//! This crate provides the [`Dispatcher`] type which coordinates the send
//! pipeline between the translator, the database, and the presence registry.
//!
//! # Architecture
//!
//! ```text
//! Send request (from gateway)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       DISPATCHER                            │
//! │                                                             │
//! │  1. Validate payload, resolve sender and target             │
//! │         ↓                                                   │
//! │  2. Translate the caption into the receiver's language      │
//! │     (cache first, engine second, fail open to original)     │
//! │         ↓                                                   │
//! │  3. Persist the message                                     │
//! │         ↓                                                   │
//! │  4. Push a live event to the receiver's sessions            │
//! │         ↓                                                   │
//! │  5. Acknowledge the sender                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Group sends translate the caption once per distinct member language and
//! fan the event out to every member except the sender.

mod dispatcher;
mod error;
mod request;
mod view;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use request::{SendAck, SendRequest, Target};
pub use view::{GroupMessageView, MessageView};

pub use presence::{Session, SessionId};
