//! Depth resolution over parent links.
//!
//! Depth is the number of parent links between a message and its root. Each
//! message's chain is walked upward only until it meets a message whose depth
//! is already known, then unwound, so every message is visited a constant
//! number of times. The walk uses an explicit stack, so long single-thread
//! conversations cannot exhaust the call stack.

use crate::conversation::{ConversationTree, Message};
use crate::error::{LayoutError, Result};

/// Compute the depth of every message, indexed by list position.
///
/// A chain longer than the number of messages must revisit a message, so it
/// is reported as [`LayoutError::CyclicParentChain`] naming the message whose
/// walk detected it.
pub fn resolve_depths(messages: &[Message], tree: &ConversationTree) -> Result<Vec<u32>> {
    let count = tree.len();
    let mut depths: Vec<Option<u32>> = vec![None; count];
    let mut chain: Vec<usize> = Vec::new();

    for start in 0..count {
        if depths[start].is_some() {
            continue;
        }

        chain.clear();
        let mut cursor = Some(start);
        // Depth of the topmost unresolved message on the chain
        let mut base = 0;

        while let Some(i) = cursor {
            if let Some(depth) = depths[i] {
                base = depth + 1;
                break;
            }
            if chain.len() >= count {
                return Err(LayoutError::CyclicParentChain {
                    id: messages[start].id.clone(),
                });
            }
            chain.push(i);
            cursor = tree.parent(i);
        }

        for (distance, &i) in chain.iter().rev().enumerate() {
            depths[i] = Some(base + distance as u32);
        }
    }

    Ok(depths.into_iter().map(Option::unwrap_or_default).collect())
}
