//! In-process volatile chat store.
//!
//! The fallback tier: a DashMap keyed by session id, holding the session
//! record and its message log. Contents die with the process. Operations
//! cannot fail, but the trait signature keeps `Result` so both tiers share
//! one interface.

use chrono::Utc;
use dashmap::DashMap;

use parley_types::chat::{ChatMessage, ChatSession, ContactInfo, SessionId};
use parley_types::error::StoreError;

use super::store::ChatStore;

/// Volatile in-process store keyed by session id.
#[derive(Default)]
pub struct MemoryChatStore {
    sessions: DashMap<SessionId, ChatSession>,
    messages: DashMap<SessionId, Vec<ChatMessage>>,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held (used by health reporting).
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn touch(&self, id: &SessionId) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.updated_at = Utc::now();
        } else {
            // A per-call fallback can write under a remote id this store has
            // never seen; materialize the session record on first touch.
            self.sessions.insert(id.clone(), ChatSession::new(id.clone()));
        }
    }
}

impl ChatStore for MemoryChatStore {
    async fn create_session(&self) -> Result<ChatSession, StoreError> {
        let session = ChatSession::new(SessionId::mint_fallback());
        self.sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn append(&self, id: &SessionId, message: &ChatMessage) -> Result<(), StoreError> {
        self.touch(id);
        self.messages
            .entry(id.clone())
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn read_history(
        &self,
        id: &SessionId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self
            .messages
            .get(id)
            .map(|log| {
                let skip = log.len().saturating_sub(limit);
                log[skip..].to_vec()
            })
            .unwrap_or_default();
        Ok(messages)
    }

    async fn save_contact(&self, id: &SessionId, contact: &ContactInfo) -> Result<(), StoreError> {
        self.touch(id);
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.contact_info = Some(contact.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_mints_fallback_id() {
        let store = MemoryChatStore::new();
        let session = store.create_session().await.unwrap();
        assert!(session.id.is_fallback());
        assert_eq!(store.session_count(), 1);
    }

    #[tokio::test]
    async fn history_returns_last_n_in_order() {
        let store = MemoryChatStore::new();
        let session = store.create_session().await.unwrap();
        for i in 0..5 {
            store
                .append(&session.id, &ChatMessage::user(format!("m{i}")))
                .await
                .unwrap();
        }
        let history = store.read_history(&session.id, 3).await.unwrap();
        let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn append_under_unknown_id_materializes_session() {
        let store = MemoryChatStore::new();
        let id = SessionId::mint_remote();
        store.append(&id, &ChatMessage::bot("hi")).await.unwrap();
        assert_eq!(store.session_count(), 1);
        assert_eq!(store.read_history(&id, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn contact_attaches_to_session() {
        let store = MemoryChatStore::new();
        let session = store.create_session().await.unwrap();
        let contact = ContactInfo {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            issue: Some("billing".to_string()),
        };
        store.save_contact(&session.id, &contact).await.unwrap();
        let stored = store.sessions.get(&session.id).unwrap();
        assert_eq!(stored.contact_info.as_ref().unwrap().name, "Ada");
    }
}
