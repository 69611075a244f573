//! ChatStore trait definition.
//!
//! The single storage interface both tiers implement: the remote document
//! store (in `parley-infra`) and the in-process volatile map. The fallback
//! store composes the two behind the same trait.

use parley_types::chat::{ChatMessage, ChatSession, ContactInfo, SessionId};
use parley_types::error::StoreError;

/// Persistence contract for chat sessions and their message logs.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatStore: Send + Sync {
    /// Create a new session and return it (the implementation mints the id).
    fn create_session(
        &self,
    ) -> impl std::future::Future<Output = Result<ChatSession, StoreError>> + Send;

    /// Append one message to a session's log.
    fn append(
        &self,
        id: &SessionId,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Read the most recent `limit` messages, ordered oldest first.
    fn read_history(
        &self,
        id: &SessionId,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, StoreError>> + Send;

    /// Attach contact details to a session.
    fn save_contact(
        &self,
        id: &SessionId,
        contact: &ContactInfo,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
