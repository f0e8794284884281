//! ConversationLayout - runs the full layout pipeline.
//!
//! # Pipeline
//!
//! 1. **Tree:** resolve parent ids into an explicit adjacency structure.
//! 2. **Depths:** iterative, memoized depth per message.
//! 3. **Plan:** branch-aware raw positions in list order.
//! 4. **Normalize:** one global vertical shift to the top margin.
//! 5. **Edges:** Bezier descriptors from the normalized positions.
//!
//! Every run owns all of its intermediate state; nothing is carried between
//! calls, so repeated runs on the same input give identical results.

use serde::Serialize;
use std::collections::HashMap;

use super::config::LayoutConfig;
use super::depth::resolve_depths;
use super::edges::{build_edges, EdgeDescriptor};
use super::normalize::normalize_positions;
use super::planner::plan_positions;
use super::point::Point;
use crate::conversation::{ConversationTree, Message, MessageId, Role};
use crate::error::{LayoutWarning, Result};

/// A message with its final position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    /// Assignment order (list order, from 0).
    pub step: usize,
    pub depth: u32,
    pub position: Point,
}

/// Size of the canvas needed to show every node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

/// Result of one layout run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// Nodes in list order.
    pub nodes: Vec<PositionedNode>,
    /// One edge per reply, in list order.
    pub edges: Vec<EdgeDescriptor>,
    /// Final position of every message.
    pub positions: HashMap<MessageId, Point>,
    /// Anomalies that degraded placement without failing the run.
    pub warnings: Vec<LayoutWarning>,
    pub canvas: CanvasSize,
}

impl LayoutResult {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Final position of a message.
    pub fn position(&self, id: &MessageId) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Bounding box of node centers as (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for node in &self.nodes {
            let Point { x, y } = node.position;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        Some((min_x, min_y, max_x, max_y))
    }
}

/// The conversation layout engine.
#[derive(Debug, Clone, Default)]
pub struct ConversationLayout {
    config: LayoutConfig,
}

impl ConversationLayout {
    /// Create a layout engine with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Create a layout engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `messages`.
    ///
    /// Fails only on input-integrity problems (duplicate ids, unknown
    /// parents, cyclic parent chains). Children listed before their parent
    /// are placed with a fallback and reported in
    /// [`LayoutResult::warnings`]. Empty input gives an empty result.
    pub fn compute(&self, messages: &[Message]) -> Result<LayoutResult> {
        let tree = ConversationTree::build(messages)?;
        if tree.is_empty() {
            return Ok(LayoutResult::default());
        }

        let depths = resolve_depths(messages, &tree)?;

        let mut plan = plan_positions(messages, &tree, &depths, &self.config);
        let adjustment = normalize_positions(&mut plan.positions, self.config.top_margin);

        let edges = build_edges(messages, &tree, &plan.positions, &self.config);

        let nodes: Vec<PositionedNode> = messages
            .iter()
            .zip(&plan.positions)
            .enumerate()
            .map(|(step, (message, &position))| PositionedNode {
                id: message.id.clone(),
                role: message.role,
                content: message.content.clone(),
                step,
                depth: depths[step],
                position,
            })
            .collect();

        let positions = nodes
            .iter()
            .map(|node| (node.id.clone(), node.position))
            .collect();

        let canvas = self.canvas_size(&nodes);

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            roots = tree.roots().len(),
            warnings = plan.warnings.len(),
            adjustment,
            "Conversation layout computed"
        );

        Ok(LayoutResult {
            nodes,
            edges,
            positions,
            warnings: plan.warnings,
            canvas,
        })
    }

    fn canvas_size(&self, nodes: &[PositionedNode]) -> CanvasSize {
        let margin = self.config.node_radius + self.config.canvas_padding;
        nodes.iter().fold(CanvasSize::default(), |size, node| CanvasSize {
            width: size.width.max(node.position.x + margin),
            height: size.height.max(node.position.y + margin),
        })
    }
}
