//! ConversationTree - explicit adjacency built once per layout run.
//!
//! Messages arrive as a flat list where each entry points at its parent. The
//! tree resolves those references once, up front, into:
//! - A petgraph `StableGraph` with one node per message (weight = list index)
//!   and one parent→child edge per reply
//! - Ordered child lists (list order), so "first child" is a direct lookup
//! - Parent indices and the list of roots
//!
//! Everything downstream works on list indices (`usize`) rather than ids.

use petgraph::algo::toposort;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Directed;
use std::collections::HashMap;

use super::message::{Message, MessageId};
use crate::error::{LayoutError, Result};

/// Parent/child structure of a message list.
#[derive(Debug)]
pub struct ConversationTree {
    /// Nodes store the message's list index.
    graph: StableGraph<usize, (), Directed>,

    /// Graph node for each list index
    nodes: Vec<NodeIndex>,

    /// Parent list index for each message (None for roots)
    parents: Vec<Option<usize>>,

    /// Children of each message, in list order
    children: Vec<Vec<usize>>,

    /// Root list indices, in list order
    roots: Vec<usize>,
}

impl ConversationTree {
    /// Resolve parent references for `messages`.
    ///
    /// Fails on duplicate ids and on parent ids that name no message. Cycles
    /// are not detected here; see [`find_cycle`](Self::find_cycle).
    pub fn build(messages: &[Message]) -> Result<Self> {
        let count = messages.len();
        let mut graph: StableGraph<usize, (), Directed> =
            StableGraph::with_capacity(count, count.saturating_sub(1));
        let mut index_of: HashMap<&MessageId, usize> = HashMap::with_capacity(count);
        let mut nodes = Vec::with_capacity(count);

        for (i, message) in messages.iter().enumerate() {
            if index_of.insert(&message.id, i).is_some() {
                return Err(LayoutError::DuplicateMessageId {
                    id: message.id.clone(),
                });
            }
            nodes.push(graph.add_node(i));
        }

        let mut parents = vec![None; count];
        let mut children = vec![Vec::new(); count];
        let mut roots = Vec::new();

        for (i, message) in messages.iter().enumerate() {
            match &message.parent_id {
                None => roots.push(i),
                Some(parent_id) => {
                    let &parent = index_of.get(parent_id).ok_or_else(|| {
                        LayoutError::DanglingParent {
                            id: message.id.clone(),
                            parent_id: parent_id.clone(),
                        }
                    })?;
                    graph.add_edge(nodes[parent], nodes[i], ());
                    parents[i] = Some(parent);
                    children[parent].push(i);
                }
            }
        }

        Ok(Self {
            graph,
            nodes,
            parents,
            children,
            roots,
        })
    }

    /// Number of messages in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent list index of message `i`.
    pub fn parent(&self, i: usize) -> Option<usize> {
        self.parents.get(i).copied().flatten()
    }

    /// Children of message `i`, in list order.
    pub fn children(&self, i: usize) -> &[usize] {
        self.children.get(i).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First child of message `i` in list order.
    pub fn first_child(&self, i: usize) -> Option<usize> {
        self.children(i).first().copied()
    }

    /// Whether `i` is the first reply its parent received in list order.
    /// Roots are never first children.
    pub fn is_first_child(&self, i: usize) -> bool {
        self.parent(i)
            .and_then(|parent| self.first_child(parent))
            .is_some_and(|first| first == i)
    }

    /// Root list indices, in list order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Number of parent→child links.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Find a message that sits on a cyclic parent chain.
    ///
    /// Returns the list index reported by the topological sort, or None if
    /// every chain ends at a root.
    pub fn find_cycle(&self) -> Option<usize> {
        match toposort(&self.graph, None) {
            Ok(_) => None,
            Err(cycle) => self.graph.node_weight(cycle.node_id()).copied(),
        }
    }
}
