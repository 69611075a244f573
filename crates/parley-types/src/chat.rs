//! Chat session and message types for Parley.
//!
//! These types model a support conversation: the session identity (including
//! which storage tier owns it), its lifecycle status, the append-only message
//! log, and submitted contact details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Reserved wire prefix marking a session that lives in the in-process
/// fallback tier. External clients can still tell the tiers apart by the
/// rendered id; internal code matches on the enum variant instead.
const FALLBACK_PREFIX: &str = "fallback-";

/// Identity of a chat session, tagged with the storage tier that owns it.
///
/// `Remote` ids address the remote document store. `Fallback` ids were minted
/// after session creation failed against the remote backend and are pinned to
/// the in-process tier for the rest of the process run -- the remote backend
/// is never attempted for them again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SessionId {
    Remote(Uuid),
    Fallback(Uuid),
}

impl SessionId {
    /// Mint a fresh remote-tier id.
    pub fn mint_remote() -> Self {
        SessionId::Remote(Uuid::now_v7())
    }

    /// Mint a fresh fallback-tier id.
    pub fn mint_fallback() -> Self {
        SessionId::Fallback(Uuid::now_v7())
    }

    /// Whether this session is pinned to the in-process fallback tier.
    pub fn is_fallback(&self) -> bool {
        matches!(self, SessionId::Fallback(_))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionId::Remote(id) => write!(f, "{id}"),
            SessionId::Fallback(id) => write!(f, "{FALLBACK_PREFIX}{id}"),
        }
    }
}

impl FromStr for SessionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = s.strip_prefix(FALLBACK_PREFIX) {
            let id = Uuid::parse_str(raw).map_err(|e| format!("invalid session id '{s}': {e}"))?;
            Ok(SessionId::Fallback(id))
        } else {
            let id = Uuid::parse_str(s).map_err(|e| format!("invalid session id '{s}': {e}"))?;
            Ok(SessionId::Remote(id))
        }
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> String {
        id.to_string()
    }
}

impl TryFrom<String> for SessionId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Lifecycle status of a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Closed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SessionStatus::Active),
            "closed" => Ok(SessionStatus::Closed),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Active
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A single message within a chat session.
///
/// Messages are append-only and ordered by `timestamp` within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
        }
    }

    /// Build a bot message stamped with the current time.
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
        }
    }
}

/// Contact details a visitor submits to request a callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
}

/// A support conversation between a visitor and the assistant.
///
/// Created on the first visitor turn; `updated_at` moves on every message or
/// contact submission. Sessions are never deleted here -- expiry is handled
/// externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
}

impl ChatSession {
    /// Build a fresh active session for the given id.
    pub fn new(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
            status: SessionStatus::Active,
            contact_info: None,
        }
    }
}
