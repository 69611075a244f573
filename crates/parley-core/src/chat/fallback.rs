//! Fallback chat store: remote primary, in-process volatile secondary.
//!
//! This is the single retry/fallback policy object used by every persistence
//! call site. The rules, in order:
//!
//! - `create_session`: one bounded retry, only for the deadline-exceeded
//!   failure class. If the retry also fails (or the first failure was of any
//!   other class), a `Fallback` id is minted locally and the session is
//!   pinned to the in-process tier for the rest of the process run.
//! - Any operation on a `Fallback` id goes straight to the local map; the
//!   remote backend is never attempted again for that session. The enum
//!   match makes this structural -- there is no prefix parsing to get wrong.
//! - Operations on a `Remote` id try the remote backend first and re-route
//!   that single call to the local map on any failure, without changing the
//!   id (soft, per-call fallback).
//!
//! `read_history` on a `Remote` id that drops to memory can return a shorter
//! window than what was actually persisted, when some writes landed remotely
//! and others fell back. That is a bounded consistency weakness of the soft
//! fallback, accepted and documented here rather than papered over.

use parley_types::chat::{ChatMessage, ChatSession, ContactInfo, SessionId};
use parley_types::error::StoreError;

use super::memory::MemoryChatStore;
use super::store::ChatStore;

/// Dual-tier chat store. `R` is the remote document store client.
pub struct FallbackChatStore<R: ChatStore> {
    remote: R,
    local: MemoryChatStore,
}

impl<R: ChatStore> FallbackChatStore<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            local: MemoryChatStore::new(),
        }
    }

    /// The in-process tier (exposed for health reporting).
    pub fn local(&self) -> &MemoryChatStore {
        &self.local
    }

    /// Create a session remotely, retrying once on deadline-exceeded only.
    async fn create_remote_with_retry(&self) -> Result<ChatSession, StoreError> {
        match self.remote.create_session().await {
            Ok(session) => Ok(session),
            Err(StoreError::DeadlineExceeded) => {
                tracing::warn!("Remote session creation hit deadline, retrying once");
                self.remote.create_session().await
            }
            Err(err) => Err(err),
        }
    }
}

impl<R: ChatStore> ChatStore for FallbackChatStore<R> {
    async fn create_session(&self) -> Result<ChatSession, StoreError> {
        match self.create_remote_with_retry().await {
            Ok(session) => Ok(session),
            Err(err) => {
                tracing::warn!(error = %err, "Remote session creation failed, minting fallback session");
                self.local.create_session().await
            }
        }
    }

    async fn append(&self, id: &SessionId, message: &ChatMessage) -> Result<(), StoreError> {
        match id {
            SessionId::Fallback(_) => self.local.append(id, message).await,
            SessionId::Remote(_) => match self.remote.append(id, message).await {
                Ok(()) => Ok(()),
                Err(err) => {
                    tracing::warn!(session_id = %id, error = %err, "Remote write failed, using memory fallback");
                    self.local.append(id, message).await
                }
            },
        }
    }

    async fn read_history(
        &self,
        id: &SessionId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        match id {
            SessionId::Fallback(_) => self.local.read_history(id, limit).await,
            SessionId::Remote(_) => match self.remote.read_history(id, limit).await {
                Ok(messages) => Ok(messages),
                Err(err) => {
                    tracing::warn!(session_id = %id, error = %err, "Remote read failed, using memory fallback");
                    self.local.read_history(id, limit).await
                }
            },
        }
    }

    async fn save_contact(&self, id: &SessionId, contact: &ContactInfo) -> Result<(), StoreError> {
        match id {
            SessionId::Fallback(_) => self.local.save_contact(id, contact).await,
            SessionId::Remote(_) => match self.remote.save_contact(id, contact).await {
                Ok(()) => Ok(()),
                Err(err) => {
                    tracing::warn!(session_id = %id, error = %err, "Remote contact save failed, using memory fallback");
                    self.local.save_contact(id, contact).await
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted outcome for a mock remote call.
    #[derive(Clone, Copy)]
    enum Outcome {
        Ok,
        Deadline,
        Unavailable,
    }

    impl Outcome {
        fn to_error(self) -> StoreError {
            match self {
                Outcome::Ok => unreachable!(),
                Outcome::Deadline => StoreError::DeadlineExceeded,
                Outcome::Unavailable => StoreError::Unavailable("down".to_string()),
            }
        }
    }

    /// Mock remote store with scripted create outcomes and switchable
    /// write/read failure. Counts every attempt so tests can assert the
    /// hard session-level fallback.
    #[derive(Default)]
    struct MockRemote {
        create_script: Mutex<VecDeque<Outcome>>,
        create_calls: AtomicUsize,
        fail_writes: std::sync::atomic::AtomicBool,
        write_attempts: AtomicUsize,
        read_attempts: AtomicUsize,
        log: Mutex<Vec<(SessionId, ChatMessage)>>,
    }

    impl MockRemote {
        fn scripted(outcomes: &[Outcome]) -> Self {
            Self {
                create_script: Mutex::new(outcomes.iter().copied().collect()),
                ..Default::default()
            }
        }
    }

    impl ChatStore for MockRemote {
        async fn create_session(&self) -> Result<ChatSession, StoreError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self
                .create_script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Outcome::Ok);
            match outcome {
                Outcome::Ok => Ok(ChatSession::new(SessionId::mint_remote())),
                other => Err(other.to_error()),
            }
        }

        async fn append(&self, id: &SessionId, message: &ChatMessage) -> Result<(), StoreError> {
            self.write_attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("down".to_string()));
            }
            self.log.lock().unwrap().push((id.clone(), message.clone()));
            Ok(())
        }

        async fn read_history(
            &self,
            id: &SessionId,
            limit: usize,
        ) -> Result<Vec<ChatMessage>, StoreError> {
            self.read_attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("down".to_string()));
            }
            let log = self.log.lock().unwrap();
            let mine: Vec<ChatMessage> = log
                .iter()
                .filter(|(mid, _)| mid == id)
                .map(|(_, m)| m.clone())
                .collect();
            let skip = mine.len().saturating_sub(limit);
            Ok(mine[skip..].to_vec())
        }

        async fn save_contact(
            &self,
            _id: &SessionId,
            _contact: &ContactInfo,
        ) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("down".to_string()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn create_success_yields_remote_id() {
        let store = FallbackChatStore::new(MockRemote::scripted(&[Outcome::Ok]));
        let session = store.create_session().await.unwrap();
        assert!(!session.id.is_fallback());
    }

    #[tokio::test]
    async fn deadline_retries_exactly_once_then_succeeds() {
        let remote = MockRemote::scripted(&[Outcome::Deadline, Outcome::Ok]);
        let store = FallbackChatStore::new(remote);
        let session = store.create_session().await.unwrap();
        assert!(!session.id.is_fallback());
        assert_eq!(store.remote.create_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn deadline_twice_mints_fallback_id() {
        let remote = MockRemote::scripted(&[Outcome::Deadline, Outcome::Deadline]);
        let store = FallbackChatStore::new(remote);
        let session = store.create_session().await.unwrap();
        assert!(session.id.is_fallback());
        assert_eq!(store.remote.create_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_deadline_failure_falls_back_without_retry() {
        let remote = MockRemote::scripted(&[Outcome::Unavailable]);
        let store = FallbackChatStore::new(remote);
        let session = store.create_session().await.unwrap();
        assert!(session.id.is_fallback());
        assert_eq!(store.remote.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fallback_id_never_touches_remote() {
        let store = FallbackChatStore::new(MockRemote::scripted(&[Outcome::Unavailable]));
        let session = store.create_session().await.unwrap();
        assert!(session.id.is_fallback());

        store
            .append(&session.id, &ChatMessage::user("hello"))
            .await
            .unwrap();
        store.read_history(&session.id, 10).await.unwrap();
        store
            .save_contact(
                &session.id,
                &ContactInfo {
                    name: "Ada".to_string(),
                    email: "a@example.com".to_string(),
                    phone: "1".to_string(),
                    issue: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(store.remote.write_attempts.load(Ordering::SeqCst), 0);
        assert_eq!(store.remote.read_attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_remote_write_window_reads_back_exactly() {
        let store = FallbackChatStore::new(MockRemote::scripted(&[Outcome::Ok]));
        let session = store.create_session().await.unwrap();

        // Remote goes down mid-session: writes fall back per call.
        store.remote.fail_writes.store(true, Ordering::SeqCst);
        store
            .append(&session.id, &ChatMessage::user("during outage 1"))
            .await
            .unwrap();
        store
            .append(&session.id, &ChatMessage::bot("during outage 2"))
            .await
            .unwrap();

        // Reads also fall back while the outage lasts; the fallback window
        // must read back exactly what was written during it.
        let history = store.read_history(&session.id, 10).await.unwrap();
        let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["during outage 1", "during outage 2"]);

        // The id itself keeps its remote tag: the next call tries the
        // remote backend again.
        store.remote.fail_writes.store(false, Ordering::SeqCst);
        store
            .append(&session.id, &ChatMessage::user("after recovery"))
            .await
            .unwrap();
        assert!(!session.id.is_fallback());
        assert_eq!(store.remote.log.lock().unwrap().len(), 1);
    }
}
