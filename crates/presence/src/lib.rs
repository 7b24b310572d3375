//! In-memory presence registry.
//!
//! Tracks which users currently have live sessions and hands out per-session
//! event channels. A user may hold several sessions at once (several devices
//! or tabs); they are online while at least one session remains.
//!
//! The registry is purely in-memory. Durable online/offline state lives in
//! the database and is updated by the dispatcher on the transitions this
//! registry reports.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chat_core::{ChatEvent, UserId};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Identifies one live session within the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

/// A freshly joined session: its id and the channel events arrive on.
pub struct Session {
    pub id: SessionId,
    pub events: UnboundedReceiver<ChatEvent>,
    /// True when this join took the user from zero sessions to one.
    pub came_online: bool,
}

type UserSessions = HashMap<SessionId, UnboundedSender<ChatEvent>>;

/// Presence registry mapping users to their live session channels.
///
/// Thread-safe; share behind an `Arc`. The outer map is only touched to
/// fetch or insert a user's entry; session mutation happens under that
/// user's own lock, so unrelated users never contend.
pub struct PresenceRegistry {
    users: RwLock<HashMap<UserId, Arc<Mutex<UserSessions>>>>,
    next_session: AtomicU64,
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_session: AtomicU64::new(1),
        }
    }

    /// Register a new session for `user_id`.
    ///
    /// Each call creates a distinct session with its own event channel, so a
    /// second device never displaces the first.
    pub async fn join(&self, user_id: UserId) -> Session {
        let id = SessionId(self.next_session.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();

        // Fast path under the shared registry lock. The guard is held through
        // the insert so a concurrent leave cannot prune the entry in between.
        let came_online = {
            let users = self.users.read().await;
            if let Some(entry) = users.get(&user_id) {
                insert_session(entry, id, tx).await
            } else {
                drop(users);
                let mut users = self.users.write().await;
                let entry = users.entry(user_id).or_default();
                insert_session(entry, id, tx).await
            }
        };

        debug!("User {} joined (session {:?})", user_id, id);

        Session {
            id,
            events: rx,
            came_online,
        }
    }

    /// Remove a session. Returns true when this was the user's last session,
    /// i.e. they just went offline. Unknown sessions are a no-op.
    pub async fn leave(&self, user_id: UserId, session_id: SessionId) -> bool {
        let went_offline = {
            let users = self.users.read().await;
            let Some(entry) = users.get(&user_id) else {
                return false;
            };
            let mut sessions = entry.lock().await;
            if sessions.remove(&session_id).is_none() {
                return false;
            }
            sessions.is_empty()
        };

        if went_offline {
            self.prune_if_empty(user_id).await;
            debug!("User {} went offline", user_id);
        }
        went_offline
    }

    /// Deliver an event to every live session of `user_id`. Returns how many
    /// sessions received it. Sessions whose receiver is gone are dropped.
    pub async fn send_to(&self, user_id: UserId, event: &ChatEvent) -> usize {
        let (delivered, now_empty) = {
            let users = self.users.read().await;
            let Some(entry) = users.get(&user_id) else {
                return 0;
            };
            let mut sessions = entry.lock().await;
            let mut delivered = 0;
            sessions.retain(|_, tx| {
                let alive = tx.send(event.clone()).is_ok();
                if alive {
                    delivered += 1;
                }
                alive
            });
            (delivered, sessions.is_empty())
        };

        if now_empty {
            self.prune_if_empty(user_id).await;
        }
        delivered
    }

    /// Whether a user currently has at least one live session.
    pub async fn is_online(&self, user_id: UserId) -> bool {
        let users = self.users.read().await;
        match users.get(&user_id) {
            Some(entry) => !entry.lock().await.is_empty(),
            None => false,
        }
    }

    /// Number of live sessions for a user.
    pub async fn session_count(&self, user_id: UserId) -> usize {
        let users = self.users.read().await;
        match users.get(&user_id) {
            Some(entry) => entry.lock().await.len(),
            None => 0,
        }
    }

    /// Users with at least one live session.
    pub async fn online_users(&self) -> Vec<UserId> {
        let users = self.users.read().await;
        let mut online = Vec::new();
        for (id, entry) in users.iter() {
            if !entry.lock().await.is_empty() {
                online.push(*id);
            }
        }
        online.sort_unstable();
        online
    }

    /// Drop a user's entry once it holds no sessions. Re-checked under the
    /// registry write lock: a join that slipped in keeps the entry alive.
    async fn prune_if_empty(&self, user_id: UserId) {
        let mut users = self.users.write().await;
        let Some(entry) = users.get(&user_id).cloned() else {
            return;
        };
        if entry.lock().await.is_empty() {
            users.remove(&user_id);
        }
    }
}

async fn insert_session(
    entry: &Mutex<UserSessions>,
    id: SessionId,
    tx: UnboundedSender<ChatEvent>,
) -> bool {
    let mut sessions = entry.lock().await;
    let came_online = sessions.is_empty();
    sessions.insert(id, tx);
    came_online
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typing(user_id: UserId) -> ChatEvent {
        ChatEvent::TypingStatus {
            user_id,
            is_typing: true,
        }
    }

    #[tokio::test]
    async fn test_join_and_leave_transitions() {
        let registry = PresenceRegistry::new();

        let s1 = registry.join(7).await;
        assert!(s1.came_online);
        assert!(registry.is_online(7).await);

        // Second device: already online.
        let s2 = registry.join(7).await;
        assert!(!s2.came_online);
        assert_eq!(registry.session_count(7).await, 2);

        // Leaving one device keeps the user online.
        assert!(!registry.leave(7, s1.id).await);
        assert!(registry.is_online(7).await);

        // Leaving the last one takes them offline.
        assert!(registry.leave(7, s2.id).await);
        assert!(!registry.is_online(7).await);
    }

    #[tokio::test]
    async fn test_leave_unknown_session_is_noop() {
        let registry = PresenceRegistry::new();
        let s = registry.join(7).await;
        assert!(!registry.leave(7, SessionId(9999)).await);
        assert!(!registry.leave(8, s.id).await);
        assert!(registry.is_online(7).await);
    }

    #[tokio::test]
    async fn test_send_reaches_all_sessions() {
        let registry = PresenceRegistry::new();
        let mut s1 = registry.join(7).await;
        let mut s2 = registry.join(7).await;

        assert_eq!(registry.send_to(7, &typing(3)).await, 2);
        assert!(matches!(
            s1.events.recv().await,
            Some(ChatEvent::TypingStatus { user_id: 3, .. })
        ));
        assert!(matches!(
            s2.events.recv().await,
            Some(ChatEvent::TypingStatus { user_id: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_send_to_offline_user_delivers_nothing() {
        let registry = PresenceRegistry::new();
        assert_eq!(registry.send_to(42, &typing(3)).await, 0);
    }

    #[tokio::test]
    async fn test_dead_sessions_are_pruned() {
        let registry = PresenceRegistry::new();
        let s1 = registry.join(7).await;
        let _s2 = registry.join(7).await;

        // Drop one receiver; the next send should prune that session.
        drop(s1.events);
        assert_eq!(registry.send_to(7, &typing(3)).await, 1);
        assert_eq!(registry.session_count(7).await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_users_do_not_interfere() {
        let registry = Arc::new(PresenceRegistry::new());

        let mut handles = Vec::new();
        for user in 1..=8 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                for _ in 0..50 {
                    let session = registry.join(user).await;
                    assert!(registry.is_online(user).await);
                    assert!(registry.leave(user, session.id).await);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(registry.online_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_online_users_sorted() {
        let registry = PresenceRegistry::new();
        let _a = registry.join(9).await;
        let _b = registry.join(2).await;
        assert_eq!(registry.online_users().await, vec![2, 9]);
    }
}
