//! Tunable constants for the conversation layout.

use serde::{Deserialize, Serialize};

use crate::conversation::Role;

/// Configuration for the conversation layout.
///
/// Deserializes from a partial JS object: missing fields keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// X coordinate of depth-0 messages.
    pub base_margin: f32,
    /// Y coordinate of the first root before normalization.
    pub initial_margin: f32,
    /// Smallest Y coordinate after normalization.
    pub top_margin: f32,
    /// Horizontal distance between consecutive depths.
    pub horizontal_spacing: f32,
    /// Standard row height. Separates consecutive roots and depth-only
    /// fallback rows, and scales the branch threshold.
    pub vertical_spacing: f32,
    /// Vertical distance between a continuation and its parent. Kept below
    /// the branch threshold so straight threads read as one flow.
    pub continuation_spacing: f32,
    /// Radius of a rendered message node.
    pub node_radius: f32,
    /// Horizontal distance from an edge endpoint to its Bezier control point.
    pub control_offset: f32,
    /// Space kept between the outermost nodes and the canvas edge.
    pub canvas_padding: f32,
    /// Fan-out step added per user branch.
    pub user_branch_step: f32,
    /// Fan-out step added per assistant branch.
    pub assistant_branch_step: f32,
    /// A parent shallower than this keeps its first reply on a straight line.
    pub continuation_depth_limit: u32,
    /// Fraction of `vertical_spacing` above which an edge counts as a branch.
    pub branch_threshold_ratio: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_margin: 50.0,
            initial_margin: 50.0,
            top_margin: 50.0,
            horizontal_spacing: 200.0,
            vertical_spacing: 100.0,
            continuation_spacing: 60.0,
            node_radius: 20.0,
            control_offset: 60.0,
            canvas_padding: 50.0,
            user_branch_step: 100.0,
            assistant_branch_step: 150.0,
            continuation_depth_limit: 2,
            branch_threshold_ratio: 0.75,
        }
    }
}

impl LayoutConfig {
    /// Fan-out step for a branch child with the given role.
    #[inline]
    pub fn branch_step(&self, role: Role) -> f32 {
        match role {
            Role::User => self.user_branch_step,
            Role::Assistant => self.assistant_branch_step,
        }
    }

    /// Vertical distance above which an edge is drawn as a branch.
    #[inline]
    pub fn branch_threshold(&self) -> f32 {
        self.vertical_spacing * self.branch_threshold_ratio
    }

    /// X coordinate of every message at `depth`.
    #[inline]
    pub fn column_x(&self, depth: u32) -> f32 {
        self.base_margin + depth as f32 * self.horizontal_spacing
    }
}
