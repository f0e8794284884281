//! Message type and related structures.
//!
//! Messages are the vertices of the conversation tree. Each message has:
//! - A unique string identifier
//! - The role of its author (user or assistant)
//! - Its text content
//! - An optional reference to the message it replies to

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique message identifier.
///
/// Wraps the id string handed over by the ingestion layer. Serializes as a
/// bare string so JavaScript callers see plain ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    /// Create a new MessageId.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for MessageId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<MessageId> for String {
    #[inline]
    fn from(id: MessageId) -> Self {
        id.0
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A turn written by the human.
    User,
    /// A turn produced by the model.
    Assistant,
}

impl Role {
    #[inline]
    pub fn is_user(self) -> bool {
        matches!(self, Self::User)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Assistant => f.write_str("assistant"),
        }
    }
}

/// One turn of a conversation, as produced by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    #[serde(default)]
    pub content: String,
    /// The message this one replies to. `None` marks a root.
    #[serde(default)]
    pub parent_id: Option<MessageId>,
}

impl Message {
    /// Create a root message.
    pub fn root(id: impl Into<MessageId>, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            parent_id: None,
        }
    }

    /// Create a reply to `parent_id`.
    pub fn reply(
        id: impl Into<MessageId>,
        parent_id: impl Into<MessageId>,
        role: Role,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            parent_id: Some(parent_id.into()),
        }
    }

    /// Whether this message starts a tree.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
