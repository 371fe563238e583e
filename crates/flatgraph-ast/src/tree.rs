//! Opening a container as a navigable syntax tree.

use std::fmt;
use std::path::Path;

use flatgraph::{FlatGraph, GraphError, NodeRef, Property, PropertyValue};

use crate::cursor::{Cursor, cursor};
use crate::labels;

/// Errors raised while locating the root of a syntax tree.
#[derive(Debug)]
pub enum SyntaxTreeError {
    /// The underlying container could not be opened or decoded.
    Graph(GraphError),
    /// No `FILE` node carries the requested source name.
    FileNotFound(String),
}

impl fmt::Display for SyntaxTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxTreeError::Graph(e) => write!(f, "graph error: {e}"),
            SyntaxTreeError::FileNotFound(name) => {
                write!(f, "no FILE node is named '{name}'")
            }
        }
    }
}

impl std::error::Error for SyntaxTreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyntaxTreeError::Graph(e) => Some(e),
            SyntaxTreeError::FileNotFound(_) => None,
        }
    }
}

impl From<GraphError> for SyntaxTreeError {
    fn from(err: GraphError) -> Self {
        SyntaxTreeError::Graph(err)
    }
}

/// A flat graph opened for syntax-tree traversal, rooted at one source file.
///
/// The tree owns its container; building it forces the schema and locates
/// the `FILE` node whose `NAME` property matches the requested source name.
pub struct SyntaxTree {
    graph: FlatGraph,
    name: String,
    root: NodeRef,
}

impl SyntaxTree {
    /// Opens the container at `path` and roots the tree at the `FILE` node
    /// named `source_name`.
    pub fn open(
        path: impl AsRef<Path>,
        source_name: &str,
    ) -> Result<Self, SyntaxTreeError> {
        let graph = FlatGraph::open(path)?;
        Self::from_graph(graph, source_name)
    }

    /// Roots a tree in an already opened container.
    pub fn from_graph(
        mut graph: FlatGraph,
        source_name: &str,
    ) -> Result<Self, SyntaxTreeError> {
        let root = Self::find_file(&mut graph, source_name)?;
        Ok(Self {
            graph,
            name: source_name.to_owned(),
            root,
        })
    }

    fn find_file(
        graph: &mut FlatGraph,
        source_name: &str,
    ) -> Result<NodeRef, SyntaxTreeError> {
        let schema = graph.schema()?;
        let type_index = schema
            .type_index(labels::FILE)
            .map_err(|e| SyntaxTreeError::Graph(e.into()))?;

        let files = &schema.nodes_by_type()[type_index];
        for (ordinal, node) in files.iter().enumerate() {
            let matches = match node.property(labels::NAME) {
                Some(Property::Scalar(PropertyValue::String(name))) => name == source_name,
                _ => false,
            };
            if matches {
                // Node counts are bounded by the u32 ref format.
                #[allow(clippy::cast_possible_truncation)]
                return Ok(NodeRef {
                    index: ordinal as u32,
                    type_index: type_index as u32,
                });
            }
        }
        Err(SyntaxTreeError::FileNotFound(source_name.to_owned()))
    }

    /// The source name this tree is rooted at.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A cursor rooted at the tree's `FILE` node.
    ///
    /// Each call returns a fresh cursor; child caches live on the cursor,
    /// not on the tree.
    pub fn cursor(&mut self) -> Result<Cursor<'_>, SyntaxTreeError> {
        let root = self.root;
        let schema = self.graph.schema()?;
        let node = schema
            .resolve(root)
            .ok_or_else(|| SyntaxTreeError::FileNotFound(self.name.clone()))?;
        Ok(cursor(schema, node))
    }

    /// Releases the tree, handing back the underlying container.
    pub fn into_graph(self) -> FlatGraph {
        self.graph
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("name", &self.name)
            .field("root", &self.root)
            .finish()
    }
}
