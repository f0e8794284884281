//! R-tree based hit testing over laid-out nodes, using the rstar crate.
//!
//! Provides O(log n) spatial queries for:
//! - Node under a pointer (nearest center within the node radius)
//! - Rectangle intersection (e.g. viewport culling)

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::layout::PositionedNode;

/// A node center in the spatial index with its index in the layout result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePoint {
    /// Index into `LayoutResult::nodes`.
    pub index: usize,
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl NodePoint {
    /// Create a new NodePoint.
    pub fn new(index: usize, x: f32, y: f32) -> Self {
        Self { index, x, y }
    }
}

impl RTreeObject for NodePoint {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for NodePoint {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over the nodes of one layout result.
///
/// Rebuilt wholesale whenever a new layout replaces the old one.
pub struct SpatialIndex {
    tree: RTree<NodePoint>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk load the centers of `nodes`.
    pub fn from_nodes(nodes: &[PositionedNode]) -> Self {
        let points = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| NodePoint::new(index, node.position.x, node.position.y))
            .collect();

        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Find the node whose circle of `radius` contains the point.
    pub fn node_at(&self, x: f32, y: f32, radius: f32) -> Option<usize> {
        let radius_sq = radius * radius;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|point| point.distance_2(&[x, y]) <= radius_sq)
            .map(|point| point.index)
    }

    /// Find all nodes whose center lies within a rectangle, sorted by index.
    pub fn in_rect(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Vec<usize> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        let mut found: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|point| point.index)
            .collect();
        found.sort_unstable();
        found
    }

    /// Clear all nodes from the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
