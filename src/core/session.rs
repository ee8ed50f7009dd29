//! Per-user conversation sessions

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Identity of the user driving a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

/// Chat that replies are addressed to. For private chats it equals the user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// A user within a chat. Sessions are keyed by both, so members of one group chat each
/// keep their own flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Peer {
    pub chat: ChatId,
    pub user: UserId,
}

impl Peer {
    pub fn new(chat: i64, user: u64) -> Self {
        Peer {
            chat: ChatId(chat),
            user: UserId(user),
        }
    }
}

impl Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.chat.0, self.user.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingSource,
    AwaitingTarget,
    AwaitingAmount,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub source: Option<String>,
    pub target: Option<String>,
    pub state: SessionState,
}

impl Session {
    pub fn awaiting_source() -> Self {
        Session {
            state: SessionState::AwaitingSource,
            ..Default::default()
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Session::default()
    }
}

/// In-memory session table. Missing entries read as an idle session.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Peer, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, peer: Peer) -> Session {
        let sessions = self.inner.lock().await;
        sessions.get(&peer).cloned().unwrap_or_default()
    }

    pub async fn put(&self, peer: Peer, session: Session) {
        let mut sessions = self.inner.lock().await;
        debug!(%peer, state = ?session.state, "Session PUT");
        sessions.insert(peer, session);
    }

    pub async fn clear(&self, peer: Peer) {
        let mut sessions = self.inner.lock().await;
        if sessions.remove(&peer).is_some() {
            debug!(%peer, "Session CLEAR");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_get_put_clear() {
        let store = SessionStore::new();
        let peer = Peer::new(42, 42);

        // Unknown users start idle
        assert!(store.get(peer).await.is_idle());

        let session = Session {
            source: Some("USD".to_string()),
            target: None,
            state: SessionState::AwaitingTarget,
        };
        store.put(peer, session.clone()).await;
        assert_eq!(store.get(peer).await, session);
        assert!(store.get(Peer::new(7, 7)).await.is_idle());

        store.clear(peer).await;
        assert!(store.get(peer).await.is_idle());
    }

    #[tokio::test]
    async fn test_group_members_have_separate_sessions() {
        let store = SessionStore::new();
        let alice = Peer::new(-100500, 1);
        let bob = Peer::new(-100500, 2);

        store.put(alice, Session::awaiting_source()).await;
        assert!(store.get(bob).await.is_idle());

        // Same user in a different chat is a different flow too
        assert!(store.get(Peer::new(1, 1)).await.is_idle());

        store.clear(bob).await;
        assert_eq!(store.get(alice).await, Session::awaiting_source());
    }

    #[test]
    fn test_awaiting_source_has_no_selections() {
        let session = Session::awaiting_source();
        assert_eq!(session.state, SessionState::AwaitingSource);
        assert!(session.source.is_none());
        assert!(session.target.is_none());
        assert!(!session.is_idle());
    }
}
