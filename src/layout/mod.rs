//! Conversation layout engine.
//!
//! Converts a flat, parent-referencing message list into node positions and
//! curved edge descriptors. The heuristic is purpose-built for shallow
//! branching chat trees: depth drives the column (time reads left to right)
//! and divergence drives the row (alternatives fan out vertically).

pub mod config;
pub mod depth;
pub mod edges;
pub mod engine;
pub mod normalize;
pub mod planner;
mod point;

pub use config::LayoutConfig;
pub use edges::{EdgeDescriptor, EdgeKind};
pub use engine::{CanvasSize, ConversationLayout, LayoutResult, PositionedNode};
pub use planner::{BranchTracker, Placement};
pub use point::Point;
