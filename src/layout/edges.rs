//! Curved edge descriptors derived from normalized node positions.
//!
//! Each reply gets one cubic Bezier edge from the right side of its parent's
//! circle to the left side of its own. Both control points are pushed
//! horizontally away from their endpoint by the same distance, so every edge
//! is the same symmetric S-curve whatever its vertical span.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::config::LayoutConfig;
use super::point::Point;
use crate::conversation::{ConversationTree, Message, MessageId};

/// Visual class of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// The reply stays close to its parent's row.
    Continuation,
    /// The reply fans out to another row; rendered distinctly.
    Branch,
}

/// Render-ready description of one parent→reply edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDescriptor {
    pub id: String,
    pub source: MessageId,
    pub target: MessageId,
    /// Whether the reply (target) was written by the user.
    pub is_user_message: bool,
    pub source_position: Point,
    pub target_position: Point,
    pub source_control: Point,
    pub target_control: Point,
    pub kind: EdgeKind,
}

impl EdgeDescriptor {
    /// Whether this edge marks a divergence in the conversation.
    #[inline]
    pub fn is_branch(&self) -> bool {
        self.kind == EdgeKind::Branch
    }

    /// SVG path data for the curve: `M sx sy C c1x c1y, c2x c2y, tx ty`.
    pub fn svg_path(&self) -> String {
        let mut path = String::with_capacity(64);
        let _ = write!(
            path,
            "M {} {} C {} {}, {} {}, {} {}",
            self.source_position.x,
            self.source_position.y,
            self.source_control.x,
            self.source_control.y,
            self.target_control.x,
            self.target_control.y,
            self.target_position.x,
            self.target_position.y,
        );
        path
    }
}

/// Build the edge into `target` from `parent` at `parent_pos`.
pub fn build_edge(
    parent: &Message,
    parent_pos: Point,
    target: &Message,
    target_pos: Point,
    config: &LayoutConfig,
) -> EdgeDescriptor {
    let source_position = parent_pos.offset(config.node_radius, 0.0);
    let target_position = target_pos.offset(-config.node_radius, 0.0);

    let kind = if (target_pos.y - parent_pos.y).abs() > config.branch_threshold() {
        EdgeKind::Branch
    } else {
        EdgeKind::Continuation
    };

    EdgeDescriptor {
        id: format!("e{}-{}", parent.id, target.id),
        source: parent.id.clone(),
        target: target.id.clone(),
        is_user_message: target.role.is_user(),
        source_position,
        target_position,
        source_control: source_position.offset(config.control_offset, 0.0),
        target_control: target_position.offset(-config.control_offset, 0.0),
        kind,
    }
}

/// Build one edge per reply, in list order.
///
/// `positions` must hold the normalized position of every message.
pub fn build_edges(
    messages: &[Message],
    tree: &ConversationTree,
    positions: &[Point],
    config: &LayoutConfig,
) -> Vec<EdgeDescriptor> {
    messages
        .iter()
        .enumerate()
        .filter_map(|(i, message)| {
            let parent = tree.parent(i)?;
            Some(build_edge(
                &messages[parent],
                positions[parent],
                message,
                positions[i],
                config,
            ))
        })
        .collect()
}
