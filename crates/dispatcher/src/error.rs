//! Error types for dispatch operations.

use chat_core::{GroupId, MessageId, UserId};
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while dispatching a message or a related operation.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The payload carries nothing to deliver.
    #[error("empty message")]
    EmptyMessage,

    /// The direct-message recipient does not exist.
    #[error("recipient {0} not found")]
    RecipientNotFound(UserId),

    /// The target group does not exist.
    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    /// The sender is not enrolled in the target group.
    #[error("user {user_id} is not a member of group {group_id}")]
    NotAGroupMember { group_id: GroupId, user_id: UserId },

    /// Only the receiver of a message may mark it read.
    #[error("user {user_id} is not the receiver of message {message_id}")]
    NotTheReceiver {
        message_id: MessageId,
        user_id: UserId,
    },

    /// Storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] DatabaseError),

    /// Internal serialization failure.
    #[error("internal error: {0}")]
    Internal(String),
}
