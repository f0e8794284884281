//! Convo Tree - WASM Module
//!
//! This module provides the layout engine that turns a branching
//! conversation (messages that each reply to one parent) into a 2D
//! node-and-edge diagram. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `conversation`: Message records, the explicit parent/child tree and
//!   referential-integrity validation
//! - `layout`: Depth resolution, branch-aware planning, normalization and
//!   edge geometry
//! - `spatial`: R-tree spatial indexing for O(log n) hit testing
//! - `error`: Fatal input errors and non-fatal layout warnings

use js_sys::Float32Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod conversation;
pub mod error;
pub mod layout;
pub mod spatial;

pub use conversation::{validate_conversation, ConversationTree, Message, MessageId, Role};
pub use error::{LayoutError, LayoutWarning, Result};
pub use layout::{
    ConversationLayout, EdgeDescriptor, EdgeKind, LayoutConfig, LayoutResult, Point,
    PositionedNode,
};

use spatial::SpatialIndex;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert a JS value into a Rust value, mapping failures to a JS error.
fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> std::result::Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Convert a Rust value into a plain JS object (maps become objects).
fn to_js<T: Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Mirror layout warnings to the browser console.
#[cfg(target_arch = "wasm32")]
fn report_warnings(warnings: &[LayoutWarning]) {
    for warning in warnings {
        web_sys::console::warn_1(&JsValue::from_str(&warning.to_string()));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn report_warnings(_warnings: &[LayoutWarning]) {}

/// Main entry point for the conversation layout engine.
///
/// Holds the most recent successful layout and a spatial index over it. A
/// new layout replaces both at once; a failed run leaves them untouched.
#[wasm_bindgen]
pub struct ConversationGraphWasm {
    engine: ConversationLayout,
    result: LayoutResult,
    spatial: SpatialIndex,
}

impl ConversationGraphWasm {
    fn with_engine(engine: ConversationLayout) -> Self {
        Self {
            engine,
            result: LayoutResult::default(),
            spatial: SpatialIndex::new(),
        }
    }

    /// Run the layout and keep the result. Used by the JS binding and tests.
    pub fn layout(&mut self, messages: &[Message]) -> Result<&LayoutResult> {
        let result = self.engine.compute(messages)?;
        self.spatial = SpatialIndex::from_nodes(&result.nodes);
        self.result = result;
        Ok(&self.result)
    }

    /// The most recent successful layout.
    pub fn result(&self) -> &LayoutResult {
        &self.result
    }

    /// Id of the message drawn under a point.
    pub fn node_at(&self, x: f32, y: f32) -> Option<&MessageId> {
        self.spatial
            .node_at(x, y, self.engine.config().node_radius)
            .map(|index| &self.result.nodes[index].id)
    }
}

#[wasm_bindgen]
impl ConversationGraphWasm {
    /// Create a layout engine with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_engine(ConversationLayout::with_defaults())
    }

    /// Create a layout engine from a (possibly partial) config object.
    ///
    /// Missing fields keep their defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> std::result::Result<ConversationGraphWasm, JsValue> {
        let config: LayoutConfig = from_js(config)?;
        Ok(Self::with_engine(ConversationLayout::new(config)))
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Compute the layout of an array of messages.
    ///
    /// Each message is `{ id, role: "user" | "assistant", content, parentId }`.
    /// Returns `{ nodes, edges, positions, warnings, canvas }`, or throws on
    /// duplicate ids, unknown parents or cyclic parent chains.
    #[wasm_bindgen(js_name = computeLayout)]
    pub fn compute_layout(&mut self, messages: JsValue) -> std::result::Result<JsValue, JsValue> {
        let messages: Vec<Message> = from_js(messages)?;
        let result = self
            .layout(&messages)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        report_warnings(&result.warnings);
        to_js(result)
    }

    /// Check an array of messages without laying it out.
    ///
    /// Returns the list of ordering warnings, or throws on fatal problems.
    pub fn validate(&self, messages: JsValue) -> std::result::Result<JsValue, JsValue> {
        let messages: Vec<Message> = from_js(messages)?;
        let warnings = validate_conversation(&messages)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        to_js(&warnings)
    }

    /// The most recent layout as a JS object.
    #[wasm_bindgen(js_name = getLayout)]
    pub fn get_layout(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.result)
    }

    /// Get the number of laid-out nodes.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.result.node_count() as u32
    }

    /// Get the number of edges.
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.result.edge_count() as u32
    }

    /// Get node positions as [x0, y0, x1, y1, ...] in node order.
    #[wasm_bindgen(js_name = getPositions)]
    pub fn get_positions(&self) -> Float32Array {
        let positions: Vec<f32> = self
            .result
            .nodes
            .iter()
            .flat_map(|node| [node.position.x, node.position.y])
            .collect();
        Float32Array::from(&positions[..])
    }

    /// Get SVG path data for every edge, in edge order.
    #[wasm_bindgen(js_name = getEdgePaths)]
    pub fn get_edge_paths(&self) -> Vec<String> {
        self.result.edges.iter().map(EdgeDescriptor::svg_path).collect()
    }

    /// Get the canvas size needed to show every node as [width, height].
    #[wasm_bindgen(js_name = getCanvasSize)]
    pub fn get_canvas_size(&self) -> Vec<f32> {
        vec![self.result.canvas.width, self.result.canvas.height]
    }

    /// Get the bounding box of all node centers.
    ///
    /// Returns [min_x, min_y, max_x, max_y], or None if nothing is laid out.
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Option<Vec<f32>> {
        self.result
            .bounds()
            .map(|(min_x, min_y, max_x, max_y)| vec![min_x, min_y, max_x, max_y])
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the message drawn under a point.
    ///
    /// Returns the message id, or None if no node circle contains the point.
    #[wasm_bindgen(js_name = findNodeAt)]
    pub fn find_node_at(&self, x: f32, y: f32) -> Option<String> {
        self.node_at(x, y).map(ToString::to_string)
    }

    /// Find all messages whose node center lies within a rectangle.
    #[wasm_bindgen(js_name = findNodesInRect)]
    pub fn find_nodes_in_rect(
        &self,
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    ) -> Vec<String> {
        self.spatial
            .in_rect(min_x, min_y, max_x, max_y)
            .into_iter()
            .map(|index| self.result.nodes[index].id.to_string())
            .collect()
    }

    /// Drop the current layout.
    pub fn clear(&mut self) {
        self.result = LayoutResult::default();
        self.spatial.clear();
    }
}

impl Default for ConversationGraphWasm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::collections::HashSet;

    fn user(id: &str, parent: Option<&str>) -> Message {
        match parent {
            Some(parent) => Message::reply(id, parent, Role::User, format!("user {id}")),
            None => Message::root(id, Role::User, format!("user {id}")),
        }
    }

    fn assistant(id: &str, parent: &str) -> Message {
        Message::reply(id, parent, Role::Assistant, format!("assistant {id}"))
    }

    /// root → m2 → {m3 → m4 → m7 → m8, m5 → m6}
    fn branching_example() -> Vec<Message> {
        vec![
            user("m1", None),
            assistant("m2", "m1"),
            user("m3", Some("m2")),
            assistant("m4", "m3"),
            user("m5", Some("m2")),
            assistant("m6", "m5"),
            user("m7", Some("m4")),
            assistant("m8", "m7"),
        ]
    }

    fn edge<'a>(result: &'a LayoutResult, source: &str, target: &str) -> &'a EdgeDescriptor {
        result
            .edges
            .iter()
            .find(|e| e.source.as_str() == source && e.target.as_str() == target)
            .unwrap_or_else(|| panic!("missing edge {source} → {target}"))
    }

    fn assert_layout_invariants(messages: &[Message], result: &LayoutResult, config: &LayoutConfig) {
        // One node per message
        assert_eq!(result.node_count(), messages.len());

        // One edge per reply, targets exactly the non-root ids
        let non_roots: HashSet<&str> = messages
            .iter()
            .filter(|m| !m.is_root())
            .map(|m| m.id.as_str())
            .collect();
        let targets: Vec<&str> = result.edges.iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets.len(), non_roots.len());
        assert_eq!(targets.iter().copied().collect::<HashSet<_>>(), non_roots);

        // Same depth, same column; deeper never left of shallower
        for a in &result.nodes {
            for b in &result.nodes {
                if a.depth == b.depth {
                    assert_eq!(a.position.x, b.position.x);
                } else if a.depth < b.depth {
                    assert!(a.position.x < b.position.x);
                }
            }
        }

        // Normalized to the top margin
        if let Some((_, min_y, _, _)) = result.bounds() {
            assert_eq!(min_y, config.top_margin);
        }
    }

    #[test]
    fn test_linear_chain() {
        let config = LayoutConfig::default();
        let messages = vec![user("1", None), assistant("2", "1"), user("3", Some("2"))];
        let result = ConversationLayout::new(config.clone()).compute(&messages).unwrap();
        assert_layout_invariants(&messages, &result, &config);

        let xs: Vec<f32> = result.nodes.iter().map(|n| n.position.x).collect();
        assert_eq!(xs, vec![50.0, 250.0, 450.0]);

        assert_eq!(result.edge_count(), 2);
        assert!(result.edges.iter().all(|e| e.kind == EdgeKind::Continuation));
        for e in &result.edges {
            let dy = (e.target_position.y - e.source_position.y).abs();
            assert_eq!(dy, config.continuation_spacing);
        }
    }

    #[test]
    fn test_branching_example() {
        let config = LayoutConfig::default();
        let messages = branching_example();
        let result = ConversationLayout::new(config.clone()).compute(&messages).unwrap();
        assert_layout_invariants(&messages, &result, &config);

        assert_eq!(result.node_count(), 8);
        assert_eq!(result.edge_count(), 7);
        assert!(result.warnings.is_empty());

        // Main thread flows straight for the first two levels
        assert_eq!(edge(&result, "m1", "m2").kind, EdgeKind::Continuation);
        assert_eq!(edge(&result, "m2", "m3").kind, EdgeKind::Continuation);
        // Second reply to m2 diverges
        assert_eq!(edge(&result, "m2", "m5").kind, EdgeKind::Branch);
        // Past the continuation depth, even first replies fan out
        assert_eq!(edge(&result, "m3", "m4").kind, EdgeKind::Branch);
        assert_eq!(edge(&result, "m4", "m7").kind, EdgeKind::Branch);

        // Raw rows: m1 50, m2 110, m3 170, m4 20, m5 10, m6 -140, m7 -80,
        // m8 -230; normalization adds 280
        let y = |id: &str| result.position(&id.into()).unwrap().y;
        assert_eq!(y("m8"), 50.0);
        assert_eq!(y("m1"), 330.0);
        assert_eq!(y("m3"), 450.0);
        assert_eq!(y("m5"), 290.0);
        assert_eq!(y("m6"), 140.0);

        // No two node circles overlap
        let nodes = &result.nodes;
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                let dx = a.position.x - b.position.x;
                let dy = a.position.y - b.position.y;
                assert!(
                    (dx * dx + dy * dy).sqrt() >= 2.0 * config.node_radius,
                    "{} and {} overlap",
                    a.id,
                    b.id
                );
            }
        }

        // m4's subtree keeps at least a continuation step off m6's row
        let m6 = y("m6");
        assert_eq!(y("m7") - m6, 60.0);
        assert_eq!(m6 - y("m8"), 90.0);
        for id in ["m7", "m8"] {
            assert!(
                (y(id) - m6).abs() >= config.continuation_spacing,
                "{id} crowds m6's row"
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let layout = ConversationLayout::with_defaults();
        let messages = branching_example();
        let first = layout.compute(&messages).unwrap();
        let second = layout.compute(&messages).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_many_siblings() {
        let config = LayoutConfig::default();
        let mut messages = vec![user("q", None)];
        for i in 0..12 {
            messages.push(assistant(&format!("a{i}"), "q"));
        }
        let result = ConversationLayout::new(config.clone()).compute(&messages).unwrap();
        assert_layout_invariants(&messages, &result, &config);

        let mut rows: Vec<f32> = result.nodes[1..].iter().map(|n| n.position.y).collect();
        rows.sort_by(f32::total_cmp);
        rows.dedup();
        assert_eq!(rows.len(), 12, "Every sibling gets its own row");
        assert_eq!(
            result.edges.iter().filter(|e| e.is_branch()).count(),
            11,
            "All but the first reply are branches"
        );
    }

    #[test]
    fn test_multiple_trees() {
        let config = LayoutConfig::default();
        let messages = vec![
            user("a", None),
            assistant("b", "a"),
            user("x", None),
            assistant("y", "x"),
        ];
        let result = ConversationLayout::new(config.clone()).compute(&messages).unwrap();
        assert_layout_invariants(&messages, &result, &config);
        assert_eq!(result.edge_count(), 2);
        assert_eq!(result.nodes[2].position.y - result.nodes[0].position.y, 100.0);
    }

    #[test]
    fn test_out_of_order_input_warns() {
        let config = LayoutConfig::default();
        let messages = vec![user("1", None), user("3", Some("2")), assistant("2", "1")];
        let result = ConversationLayout::new(config.clone()).compute(&messages).unwrap();

        assert_layout_invariants(&messages, &result, &config);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.warnings,
            validate_conversation(&messages).unwrap(),
            "Layout and validation agree on ordering problems"
        );
    }

    #[test]
    fn test_cycle_fails_without_partial_result() {
        let mut graph = ConversationGraphWasm::new();
        graph.layout(&branching_example()).unwrap();
        assert_eq!(graph.node_count(), 8);

        let cyclic = vec![user("1", None), assistant("2", "3"), user("3", Some("2"))];
        let err = graph.layout(&cyclic).unwrap_err();
        assert!(matches!(err, LayoutError::CyclicParentChain { .. }));

        // Previous layout is still in place
        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.edge_count(), 7);
    }

    #[test]
    fn test_new_layout_replaces_old() {
        let mut graph = ConversationGraphWasm::new();
        graph.layout(&branching_example()).unwrap();
        graph.layout(&[user("solo", None)]).unwrap();

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.get_canvas_size(), vec![120.0, 120.0]);
        assert_eq!(graph.get_bounds(), Some(vec![50.0, 50.0, 50.0, 50.0]));
        assert_eq!(graph.node_at(50.0, 50.0), Some(&MessageId::new("solo")));
        assert_eq!(graph.find_node_at(50.0, 50.0), Some("solo".to_string()));
        assert_eq!(graph.find_node_at(300.0, 300.0), None);

        graph.clear();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.get_bounds(), None);
        assert_eq!(graph.find_node_at(50.0, 50.0), None);
    }

    #[test]
    fn test_hit_testing_after_layout() {
        let mut graph = ConversationGraphWasm::new();
        graph.layout(&branching_example()).unwrap();

        for node in graph.result().nodes.clone() {
            let hit = graph.node_at(node.position.x + 5.0, node.position.y - 5.0);
            assert_eq!(hit, Some(&node.id));
        }

        // Column of depth 2 holds m3 and m5
        let column = graph.find_nodes_in_rect(440.0, 0.0, 460.0, 10_000.0);
        assert_eq!(column, vec!["m3".to_string(), "m5".to_string()]);

        assert_eq!(graph.get_edge_paths().len(), 7);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = ConversationLayout::with_defaults()
            .compute(&[user("1", None), assistant("2", "1")])
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["nodes"][1]["id"], "2");
        assert_eq!(json["nodes"][1]["role"], "assistant");
        assert_eq!(json["edges"][0]["isUserMessage"], false);
        assert_eq!(json["edges"][0]["kind"], "continuation");
        assert_eq!(json["edges"][0]["sourcePosition"]["x"], 70.0);
        assert_eq!(json["positions"]["1"]["y"], 50.0);
        assert_eq!(json["canvas"]["width"], 320.0);
    }
}
