//! Cursors over the syntax layer of a graph.

use flatgraph::{Node, NodeView, Schema};

use crate::labels;

/// A read-only cursor over one syntax node.
///
/// This is the core traversal projection instantiated for the syntax tree:
/// children are the destinations of the node's outgoing [`labels::AST`]
/// edges, computed lazily and cached per cursor instance.
pub type Cursor<'g> = NodeView<'g>;

/// Creates a cursor rooted at `node`, following outgoing `AST` edges.
pub fn cursor<'g>(schema: &'g Schema, node: &'g Node) -> Cursor<'g> {
    NodeView::new(schema, node, [labels::AST])
}
