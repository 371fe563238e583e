//! Read-only traversal projection over single nodes.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::schema::{Direction, Node, Property, Schema};

/// A read-only lens over one node.
///
/// The view pairs a node with the schema that owns it, so edge destinations
/// can be resolved, and with a label set that selects which outgoing edges
/// count as "children". Child views are computed on first access and cached
/// per view instance; repeated traversal is cheap. No graph-wide computation
/// happens here — the projection is evaluated node by node, on demand.
pub struct NodeView<'g> {
    schema: &'g Schema,
    node: &'g Node,
    labels: Arc<[String]>,
    children: OnceCell<Vec<NodeView<'g>>>,
}

impl<'g> NodeView<'g> {
    /// Creates a projection over `node` that follows outgoing edges whose
    /// label is in `labels`.
    pub fn new(
        schema: &'g Schema,
        node: &'g Node,
        labels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let labels: Arc<[String]> = labels.into_iter().map(Into::into).collect();
        Self::with_labels(schema, node, labels)
    }

    fn with_labels(schema: &'g Schema, node: &'g Node, labels: Arc<[String]>) -> Self {
        Self {
            schema,
            node,
            labels,
            children: OnceCell::new(),
        }
    }

    /// The node's type label.
    pub fn label(&self) -> &str {
        self.node.label()
    }

    /// The node's property map.
    pub fn properties(&self) -> &HashMap<String, Property> {
        self.node.properties()
    }

    /// Looks up one property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.node.property(name)
    }

    /// The wrapped node.
    pub fn node(&self) -> &'g Node {
        self.node
    }

    /// Child projections: the destinations of this node's outgoing edges
    /// whose label is in the view's label set, in adjacency-list order.
    ///
    /// Computed lazily and memoized, so calling this repeatedly costs one
    /// filter pass at most. Children inherit the same label set.
    pub fn children(&self) -> &[NodeView<'g>] {
        self.children.get_or_init(|| {
            self.node
                .edges()
                .iter()
                .filter(|edge| {
                    edge.direction() == Direction::Outgoing
                        && self.labels.iter().any(|label| label == edge.label())
                })
                .filter_map(|edge| self.schema.resolve(edge.destination()))
                .map(|child| NodeView::with_labels(self.schema, child, Arc::clone(&self.labels)))
                .collect()
        })
    }
}

impl fmt::Debug for NodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeView")
            .field("label", &self.label())
            .field("edge_labels", &self.labels)
            .field("children_cached", &self.children.get().is_some())
            .finish()
    }
}
