//! Main dispatcher that coordinates the message pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use chat_core::{
    ChatEvent, GroupId, MessageBody, MessageEvent, MessageId, SenderInfo, UserId,
};
use database::{contact, group, message, user, Database, DatabaseError, NewGroupMessage, NewMessage};
use presence::{PresenceRegistry, Session, SessionId};
use tracing::{debug, info, warn};
use translator::Translator;

use crate::error::DispatchError;
use crate::request::{SendAck, SendRequest, Target};
use crate::view::{GroupMessageView, MessageView};

/// The message pipeline: validate, translate, persist, notify.
///
/// A message is acknowledged to the sender only once it is durably stored;
/// live notification happens strictly after persistence, so a receiver never
/// sees a message that history would not return. Delivery to sessions is
/// best-effort; offline receivers pick the message up from history.
pub struct Dispatcher {
    db: Database,
    translator: Arc<Translator>,
    presence: Arc<PresenceRegistry>,
}

impl Dispatcher {
    pub fn new(db: Database, translator: Arc<Translator>, presence: Arc<PresenceRegistry>) -> Self {
        Self {
            db,
            translator,
            presence,
        }
    }

    pub fn presence(&self) -> &Arc<PresenceRegistry> {
        &self.presence
    }

    pub fn translator(&self) -> &Arc<Translator> {
        &self.translator
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Dispatch a message to a user or a group.
    pub async fn send(&self, request: SendRequest) -> Result<SendAck, DispatchError> {
        if request.body.is_empty() {
            return Err(DispatchError::EmptyMessage);
        }

        let sender = user::get_user(self.db.pool(), request.sender_id).await?;
        let source = request
            .language_override
            .clone()
            .unwrap_or_else(|| sender.language.clone());

        match request.target {
            Target::User(receiver_id) => {
                self.send_direct(sender, receiver_id, request.body, source)
                    .await
            }
            Target::Group(group_id) => {
                self.send_group(sender, group_id, request.body, source).await
            }
        }
    }

    async fn send_direct(
        &self,
        sender: database::User,
        receiver_id: UserId,
        body: MessageBody,
        source: String,
    ) -> Result<SendAck, DispatchError> {
        let receiver = user::get_user(self.db.pool(), receiver_id)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound { .. } => DispatchError::RecipientNotFound(receiver_id),
                e => e.into(),
            })?;

        let caption = body.caption();
        let translated = self
            .translator
            .translate(&caption, &source, &receiver.language)
            .await;

        let delivered = self.presence.is_online(receiver.id).await;
        let message_id = message::append_message(
            self.db.pool(),
            &NewMessage {
                sender_id: sender.id,
                receiver_id: receiver.id,
                content: caption.clone(),
                translated_content: translated.clone(),
                original_language: source,
                translated_language: receiver.language.clone(),
                timestamp_ms: None,
                is_delivered: delivered,
                body: body.clone(),
            },
        )
        .await?;
        let row = message::get_message(self.db.pool(), message_id).await?;

        // Persisted; live delivery from here on is best-effort.
        let mut event = MessageEvent::new(
            message_id,
            sender_info(&sender),
            receiver.id,
            caption,
            translated.clone(),
            row.timestamp_ms,
        );
        apply_body(&mut event, &body);
        let sessions = self
            .presence
            .send_to(receiver.id, &ChatEvent::for_kind(body.kind(), event))
            .await;

        debug!(
            "Message {} from {} to {} ({} live sessions)",
            message_id, sender.id, receiver.id, sessions
        );

        Ok(SendAck {
            message_id,
            timestamp_ms: row.timestamp_ms,
            translated_content: translated,
        })
    }

    async fn send_group(
        &self,
        sender: database::User,
        group_id: GroupId,
        body: MessageBody,
        source: String,
    ) -> Result<SendAck, DispatchError> {
        group::get_group(self.db.pool(), group_id)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound { .. } => DispatchError::GroupNotFound(group_id),
                e => e.into(),
            })?;
        if !group::is_member(self.db.pool(), group_id, sender.id).await? {
            return Err(DispatchError::NotAGroupMember {
                group_id,
                user_id: sender.id,
            });
        }

        let members = group::member_users(self.db.pool(), group_id).await?;
        let caption = body.caption();

        // One engine call per distinct member language; members sharing a
        // language share the translation.
        let mut translations: HashMap<String, String> = HashMap::new();
        translations.insert(source.clone(), caption.clone());
        for member in &members {
            if !translations.contains_key(&member.language) {
                let translated = self
                    .translator
                    .translate(&caption, &source, &member.language)
                    .await;
                translations.insert(member.language.clone(), translated);
            }
        }

        let blob = serde_json::to_string(&translations)
            .map_err(|e| DispatchError::Internal(format!("unencodable translations: {}", e)))?;
        let message_id = group::append_group_message(
            self.db.pool(),
            &NewGroupMessage {
                group_id,
                sender_id: sender.id,
                content: caption.clone(),
                translated_contents: blob,
                timestamp_ms: None,
            },
        )
        .await?;
        let row = group::get_group_message(self.db.pool(), message_id).await?;

        for member in members.iter().filter(|m| m.id != sender.id) {
            let translated = translations
                .get(&member.language)
                .map(String::as_str)
                .unwrap_or(&caption);
            let mut event = MessageEvent::new(
                message_id,
                sender_info(&sender),
                member.id,
                caption.clone(),
                translated,
                row.timestamp_ms,
            );
            event.group_id = Some(group_id);
            apply_body(&mut event, &body);
            self.presence
                .send_to(member.id, &ChatEvent::for_kind(body.kind(), event))
                .await;
        }

        debug!(
            "Group message {} from {} to group {} ({} members)",
            message_id,
            sender.id,
            group_id,
            members.len()
        );

        Ok(SendAck {
            message_id,
            timestamp_ms: row.timestamp_ms,
            translated_content: caption,
        })
    }

    /// The full conversation between two users, oldest first.
    pub async fn fetch_history(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> Result<Vec<MessageView>, DispatchError> {
        let rows = message::messages_between(self.db.pool(), user_a, user_b).await?;
        rows.into_iter().map(MessageView::from_row).collect()
    }

    /// A group's message log, oldest first. Members only.
    pub async fn fetch_group_history(
        &self,
        group_id: GroupId,
        requester: UserId,
    ) -> Result<Vec<GroupMessageView>, DispatchError> {
        if !group::is_member(self.db.pool(), group_id, requester).await? {
            return Err(DispatchError::NotAGroupMember {
                group_id,
                user_id: requester,
            });
        }
        let rows = group::group_messages(self.db.pool(), group_id).await?;
        rows.into_iter().map(GroupMessageView::from_row).collect()
    }

    /// Mark one message read on behalf of its receiver, notifying the sender.
    pub async fn mark_read(
        &self,
        message_id: MessageId,
        reader_id: UserId,
    ) -> Result<(), DispatchError> {
        let row = message::get_message(self.db.pool(), message_id).await?;
        if row.receiver_id != reader_id {
            return Err(DispatchError::NotTheReceiver {
                message_id,
                user_id: reader_id,
            });
        }

        message::mark_read(self.db.pool(), message_id).await?;
        self.presence
            .send_to(
                row.sender_id,
                &ChatEvent::MessageRead {
                    message_id,
                    reader_id,
                },
            )
            .await;
        Ok(())
    }

    /// Mark every unread message from `contact_id` to `reader_id` as read,
    /// notifying the contact when anything changed. Returns the count.
    pub async fn mark_all_read(
        &self,
        reader_id: UserId,
        contact_id: UserId,
    ) -> Result<u64, DispatchError> {
        let count = message::mark_all_read_from(self.db.pool(), contact_id, reader_id).await?;
        if count > 0 {
            self.presence
                .send_to(
                    contact_id,
                    &ChatEvent::MessagesRead {
                        contact_id,
                        reader_id,
                        count,
                    },
                )
                .await;
        }
        Ok(count)
    }

    /// Unread message counts for a user, grouped by sender.
    pub async fn unread_counts(&self, user_id: UserId) -> Result<Vec<(UserId, i64)>, DispatchError> {
        Ok(message::unread_counts(self.db.pool(), user_id).await?)
    }

    /// Register a live session for a user.
    ///
    /// On the offline-to-online transition the durable flag is set and every
    /// user who has this user as a contact is notified.
    pub async fn connect(&self, user_id: UserId) -> Result<Session, DispatchError> {
        let profile = user::get_user(self.db.pool(), user_id).await?;
        let session = self.presence.join(user_id).await;

        if session.came_online {
            user::set_online(self.db.pool(), user_id).await?;
            let delivered = message::mark_delivered_to(self.db.pool(), user_id).await?;
            if delivered > 0 {
                debug!("Marked {} messages delivered to user {}", delivered, user_id);
            }
            info!("User {} ({}) is online", user_id, profile.name);
            self.notify_watchers(
                user_id,
                ChatEvent::UserStatus {
                    user_id,
                    online: true,
                    status_line: Some(profile.status_line),
                    last_seen_ms: None,
                },
            )
            .await;
        }

        Ok(session)
    }

    /// Drop a live session. On the online-to-offline transition the durable
    /// flag and last-seen timestamp are written and watchers are notified.
    pub async fn disconnect(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<(), DispatchError> {
        if !self.presence.leave(user_id, session_id).await {
            return Ok(());
        }

        let last_seen_ms = chat_core::now_ms();
        user::set_offline(self.db.pool(), user_id, last_seen_ms).await?;
        info!("User {} is offline", user_id);
        self.notify_watchers(
            user_id,
            ChatEvent::UserStatus {
                user_id,
                online: false,
                status_line: None,
                last_seen_ms: Some(last_seen_ms),
            },
        )
        .await;
        Ok(())
    }

    /// Relay a typing indicator to a recipient's live sessions.
    pub async fn typing(&self, sender_id: UserId, recipient_id: UserId, is_typing: bool) -> usize {
        self.presence
            .send_to(
                recipient_id,
                &ChatEvent::TypingStatus {
                    user_id: sender_id,
                    is_typing,
                },
            )
            .await
    }

    /// Translate a text without sending anything, for compose-time preview.
    ///
    /// When `source` is absent the language is detected first. Returns the
    /// translation together with the source language that was used.
    pub async fn translate_preview(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> (String, String) {
        let source = match source {
            Some(lang) => lang.to_string(),
            None => self.translator.detect_language(text).await,
        };
        let translated = self.translator.translate(text, &source, target).await;
        (translated, source)
    }

    async fn notify_watchers(&self, user_id: UserId, event: ChatEvent) {
        let watchers = match contact::watchers_of(self.db.pool(), user_id).await {
            Ok(watchers) => watchers,
            Err(e) => {
                warn!("Failed to load watchers of {}: {}", user_id, e);
                return;
            }
        };
        for watcher in watchers {
            self.presence.send_to(watcher, &event).await;
        }
    }
}

fn sender_info(user: &database::User) -> SenderInfo {
    SenderInfo {
        id: user.id,
        name: user.name.clone(),
        avatar: user.avatar.clone(),
    }
}

fn apply_body(event: &mut MessageEvent, body: &MessageBody) {
    match body {
        MessageBody::Text(_) => {}
        MessageBody::File(file) => event.file = Some(file.clone()),
        MessageBody::MultipleFiles(files) => event.files = Some(files.clone()),
        MessageBody::Voice {
            file,
            duration_secs,
        } => {
            event.file = Some(file.clone());
            event.duration_secs = Some(*duration_secs);
        }
        MessageBody::Location {
            latitude,
            longitude,
        } => {
            event.latitude = Some(*latitude);
            event.longitude = Some(*longitude);
        }
        MessageBody::ContactCard(card) => event.contact = Some(card.clone()),
    }
}
