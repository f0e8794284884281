//! Error types for the layout pipeline.
//!
//! Only input-integrity failures are errors. Recoverable anomalies (a child
//! seen before its parent was placed) are reported as
//! [`LayoutWarning`]s on the result instead.

use serde::Serialize;

use crate::conversation::MessageId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("duplicate message id: {id}")]
    DuplicateMessageId { id: MessageId },

    #[error("message {id} references unknown parent {parent_id}")]
    DanglingParent { id: MessageId, parent_id: MessageId },

    #[error("parent chain starting at {id} is cyclic")]
    CyclicParentChain { id: MessageId },
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Non-fatal anomaly raised while laying out an otherwise valid conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LayoutWarning {
    /// The message was visited before its parent had a position, so it got
    /// the depth-only fallback placement.
    #[error("message {id} appears before its parent {parent_id}")]
    ParentAfterChild { id: MessageId, parent_id: MessageId },
}
