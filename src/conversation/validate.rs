//! Referential-integrity checks for message lists.
//!
//! The layout engine trusts its input beyond what it needs to stay total.
//! Callers that ingest raw transcripts run [`validate_conversation`] first to
//! reject malformed lists outright and to learn about ordering problems that
//! would otherwise only show up as degraded placements.

use super::message::Message;
use super::tree::ConversationTree;
use crate::error::{LayoutError, LayoutWarning, Result};

/// Check `messages` for duplicate ids, dangling parents and cycles.
///
/// On success returns the ordering violations found (children listed before
/// their parent). These are not fatal: the layout places such children with
/// a fallback rule.
pub fn validate_conversation(messages: &[Message]) -> Result<Vec<LayoutWarning>> {
    let tree = ConversationTree::build(messages)?;

    if let Some(i) = tree.find_cycle() {
        return Err(LayoutError::CyclicParentChain {
            id: messages[i].id.clone(),
        });
    }

    let warnings = messages
        .iter()
        .enumerate()
        .filter_map(|(i, message)| {
            let parent = tree.parent(i)?;
            (parent > i).then(|| LayoutWarning::ParentAfterChild {
                id: message.id.clone(),
                parent_id: messages[parent].id.clone(),
            })
        })
        .collect();

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{MessageId, Role};

    #[test]
    fn test_valid_conversation() {
        let messages = vec![
            Message::root("1", Role::User, "hello"),
            Message::reply("2", "1", Role::Assistant, "hi"),
            Message::reply("3", "2", Role::User, "how are you"),
        ];
        assert_eq!(validate_conversation(&messages), Ok(Vec::new()));
    }

    #[test]
    fn test_empty_conversation_is_valid() {
        assert_eq!(validate_conversation(&[]), Ok(Vec::new()));
    }

    #[test]
    fn test_cycle_rejected() {
        let messages = vec![
            Message::root("1", Role::User, ""),
            Message::reply("2", "3", Role::Assistant, ""),
            Message::reply("3", "2", Role::User, ""),
        ];
        let err = validate_conversation(&messages).unwrap_err();
        assert!(matches!(err, LayoutError::CyclicParentChain { .. }));
    }

    #[test]
    fn test_dangling_parent_rejected() {
        let messages = vec![
            Message::root("1", Role::User, ""),
            Message::reply("2", "missing", Role::Assistant, ""),
        ];
        assert_eq!(
            validate_conversation(&messages),
            Err(LayoutError::DanglingParent {
                id: MessageId::new("2"),
                parent_id: MessageId::new("missing"),
            })
        );
    }

    #[test]
    fn test_ordering_violation_reported() {
        let messages = vec![
            Message::root("1", Role::User, ""),
            Message::reply("3", "2", Role::User, ""),
            Message::reply("2", "1", Role::Assistant, ""),
        ];
        let warnings = validate_conversation(&messages).unwrap();
        assert_eq!(
            warnings,
            vec![LayoutWarning::ParentAfterChild {
                id: MessageId::new("3"),
                parent_id: MessageId::new("2"),
            }]
        );
    }
}
