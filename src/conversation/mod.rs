//! Conversation input model.
//!
//! This module holds the message records handed over by the ingestion layer
//! and the explicit parent/child structure derived from them.

mod message;
mod tree;
mod validate;

pub use message::{Message, MessageId, Role};
pub use tree::ConversationTree;
pub use validate::validate_conversation;
