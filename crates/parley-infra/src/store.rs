//! RestChatStore -- concrete [`ChatStore`] implementation for the remote
//! document store.
//!
//! Sessions are documents addressed by id (`/v1/chats/{id}`), with the
//! message log as a sub-resource. Every call carries a bounded timeout;
//! a timeout surfaces as [`StoreError::DeadlineExceeded`] so the fallback
//! store can apply its retry class correctly.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and only exposed when
//! constructing request headers.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use parley_core::chat::ChatStore;
use parley_types::chat::{ChatMessage, ChatSession, ContactInfo, SessionId};
use parley_types::error::StoreError;

/// Remote document-store client.
pub struct RestChatStore {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

/// Wire shape of a persisted chat document.
#[derive(Debug, Serialize, Deserialize)]
struct ChatDocument {
    id: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contact_info: Option<ContactInfo>,
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

impl ChatDocument {
    fn from_session(session: &ChatSession) -> Self {
        Self {
            id: session.id.to_string(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            status: session.status.to_string(),
            contact_info: session.contact_info.clone(),
            messages: Vec::new(),
        }
    }
}

/// Wire shape of a message-log read.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

/// Wire shape of a contact update.
#[derive(Debug, Serialize)]
struct ContactPatch<'a> {
    contact_info: &'a ContactInfo,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl RestChatStore {
    /// Create a new store client with the given bounded request timeout.
    pub fn new(base_url: String, api_key: SecretString, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_transport_error(err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::DeadlineExceeded
        } else if err.is_decode() {
            StoreError::Serialization(err.to_string())
        } else {
            StoreError::Unavailable(err.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            404 => StoreError::NotFound,
            _ => StoreError::Unavailable(format!("HTTP {status}: {body}")),
        })
    }
}

impl ChatStore for RestChatStore {
    async fn create_session(&self) -> Result<ChatSession, StoreError> {
        let session = ChatSession::new(SessionId::mint_remote());
        let document = ChatDocument::from_session(&session);

        let response = self
            .client
            .put(self.url(&format!("/v1/chats/{}", session.id)))
            .header("x-api-key", self.api_key.expose_secret())
            .json(&document)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        Self::check_status(response).await?;

        tracing::debug!(session_id = %session.id, "Created remote chat session");
        Ok(session)
    }

    async fn append(&self, id: &SessionId, message: &ChatMessage) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.url(&format!("/v1/chats/{id}/messages")))
            .header("x-api-key", self.api_key.expose_secret())
            .json(message)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn read_history(
        &self,
        id: &SessionId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("/v1/chats/{id}/messages")))
            .query(&[("limit", limit)])
            .header("x-api-key", self.api_key.expose_secret())
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        let response = Self::check_status(response).await?;

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(body.messages)
    }

    async fn save_contact(&self, id: &SessionId, contact: &ContactInfo) -> Result<(), StoreError> {
        let patch = ContactPatch {
            contact_info: contact,
            updated_at: chrono::Utc::now(),
        };
        let response = self
            .client
            .patch(self.url(&format!("/v1/chats/{id}")))
            .header("x-api-key", self.api_key.expose_secret())
            .json(&patch)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        Self::check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_document_matches_persisted_shape() {
        let session = ChatSession::new(SessionId::mint_remote());
        let document = ChatDocument::from_session(&session);
        let json = serde_json::to_value(&document).unwrap();

        assert_eq!(json["status"], "active");
        assert!(json["messages"].as_array().unwrap().is_empty());
        assert!(json.get("contact_info").is_none());
        assert_eq!(json["id"], session.id.to_string());
    }

    #[test]
    fn messages_response_tolerates_missing_field() {
        let body: MessagesResponse = serde_json::from_str("{}").unwrap();
        assert!(body.messages.is_empty());

        let body: MessagesResponse = serde_json::from_str(
            r#"{ "messages": [ { "content": "hi", "sender": "user",
                 "timestamp": "2026-01-05T10:00:00Z" } ] }"#,
        )
        .unwrap();
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].content, "hi");
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let store = RestChatStore::new(
            "https://store.example.com/".to_string(),
            SecretString::from("key".to_string()),
            Duration::from_secs(30),
        );
        assert_eq!(
            store.url("/v1/chats/abc"),
            "https://store.example.com/v1/chats/abc"
        );
    }
}
