//! Branch-aware position planning.
//!
//! Messages are placed in list order. X always follows depth, so every
//! message at the same conversational depth lines up in one column. Y
//! separates alternative paths:
//!
//! 1. **Root:** stacked `vertical_spacing` apart from `initial_margin`.
//! 2. **Continuation:** the first reply to a shallow parent sits one
//!    `continuation_spacing` below the parent's last placed child (or the parent
//!    itself), keeping the opening exchange on a straight line.
//! 3. **Branch:** every other reply fans out from the parent's row. Each
//!    branch grows the parent's offset by a role-dependent step and flips its
//!    sign, starting upward, so siblings alternate above and below.
//! 4. **Fallback:** a reply whose parent is listed later has no anchor yet. It
//!    is placed from its depth alone and a warning is recorded.
//!
//! Positions produced here are not normalized; branches can land above the
//! top margin.
//!
//! Offsets are tracked per parent only, so cousins under different parents
//! can land on the same point (for example root → {1, 2, 4, 9}, 2 → 3 →
//! {7, 8}, 4 → 5 → 6 with alternating roles puts 6 and 8 on one point).
//! Renderers and hit testing must tolerate coincident nodes.

use std::collections::HashMap;

use super::config::LayoutConfig;
use super::point::Point;
use crate::conversation::{ConversationTree, Message};
use crate::error::LayoutWarning;

/// How a message's position was chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Root,
    Continuation,
    /// Fanned out from the parent's row by `offset`.
    Branch { offset: f32 },
    Fallback,
}

/// Per-parent fan-out state for one layout run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchTracker {
    /// Y most recently assigned to a child of this parent.
    pub last_y: f32,
    /// Signed offset of the most recent branch child from the parent's row.
    pub offset: f32,
}

impl BranchTracker {
    /// Tracker for a parent placed at `parent_y` with no children yet.
    pub fn new(parent_y: f32) -> Self {
        Self {
            last_y: parent_y,
            offset: 0.0,
        }
    }

    /// Grow the offset by `step` and flip its side. Returns the new offset.
    pub fn advance(&mut self, step: f32) -> f32 {
        let magnitude = self.offset.abs() + step;
        self.offset = if self.offset < 0.0 { magnitude } else { -magnitude };
        self.offset
    }
}

/// Output of the planning pass, indexed by list position.
#[derive(Debug)]
pub struct Plan {
    pub positions: Vec<Point>,
    pub placements: Vec<Placement>,
    pub warnings: Vec<LayoutWarning>,
}

/// Assign a raw position to every message.
///
/// `depths` must come from [`resolve_depths`](super::depth::resolve_depths)
/// for the same `messages` and `tree`.
pub fn plan_positions(
    messages: &[Message],
    tree: &ConversationTree,
    depths: &[u32],
    config: &LayoutConfig,
) -> Plan {
    let count = messages.len();
    let mut placed: Vec<Option<Point>> = vec![None; count];
    let mut placements = Vec::with_capacity(count);
    let mut warnings = Vec::new();
    let mut trackers: HashMap<usize, BranchTracker> = HashMap::new();
    let mut roots_seen = 0u32;

    for (i, message) in messages.iter().enumerate() {
        let depth = depths[i];
        let x = config.column_x(depth);

        let (y, placement) = match tree.parent(i) {
            None => {
                let y = config.initial_margin + roots_seen as f32 * config.vertical_spacing;
                roots_seen += 1;
                (y, Placement::Root)
            }
            Some(parent) => match placed[parent] {
                Some(parent_pos) => {
                    let tracker = trackers
                        .entry(parent)
                        .or_insert_with(|| BranchTracker::new(parent_pos.y));

                    let continues = tree.is_first_child(i)
                        && depths[parent] < config.continuation_depth_limit;

                    let placed_at = if continues {
                        (tracker.last_y + config.continuation_spacing, Placement::Continuation)
                    } else {
                        let offset = tracker.advance(config.branch_step(message.role));
                        (parent_pos.y + offset, Placement::Branch { offset })
                    };
                    tracker.last_y = placed_at.0;
                    placed_at
                }
                None => {
                    let parent_id = &messages[parent].id;
                    tracing::warn!(
                        id = %message.id,
                        parent_id = %parent_id,
                        "Parent not placed yet, using depth-only placement"
                    );
                    warnings.push(LayoutWarning::ParentAfterChild {
                        id: message.id.clone(),
                        parent_id: parent_id.clone(),
                    });
                    let y = config.initial_margin + depth as f32 * config.vertical_spacing;
                    (y, Placement::Fallback)
                }
            },
        };

        placed[i] = Some(Point::new(x, y));
        placements.push(placement);
    }

    Plan {
        positions: placed.into_iter().map(Option::unwrap_or_default).collect(),
        placements,
        warnings,
    }
}
