//! The manifest: structured metadata describing every stream in a container.
//!
//! The manifest is a JSON object stored at the offset recorded in the fixed
//! header. It is loaded once per container and immutable after load.

use std::fmt;

use serde::Deserialize;

/// Logical element type of a compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// One element per byte; nonzero is true.
    Bool,
    /// Little-endian unsigned 32-bit integers.
    Int,
    /// 32-bit string pool handles.
    String,
    /// Pairs of 32-bit integers: (node index, node-type index).
    Ref,
    /// Raw bytes, returned unchanged.
    Byte,
}

impl StreamKind {
    /// Fixed element width in bytes, or `None` for raw byte streams.
    pub fn element_width(self) -> Option<usize> {
        match self {
            StreamKind::Bool => Some(1),
            StreamKind::Int | StreamKind::String => Some(4),
            StreamKind::Ref => Some(8),
            StreamKind::Byte => None,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamKind::Bool => "bool",
            StreamKind::Int => "int",
            StreamKind::String => "string",
            StreamKind::Ref => "ref",
            StreamKind::Byte => "byte",
        };
        f.write_str(name)
    }
}

/// Location and size of one independently compressed stream.
///
/// Blocks are not seekable mid-stream; a stream is always read and
/// decompressed in full, and its decompressed size must equal
/// `decompressed_length` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamDescriptor {
    /// Logical type of the decompressed elements.
    #[serde(rename = "type")]
    pub kind: StreamKind,
    /// Absolute byte offset of the compressed block within the file.
    #[serde(rename = "startOffset")]
    pub start_offset: u64,
    /// Length of the compressed block in bytes.
    #[serde(rename = "compressedLength")]
    pub compressed_length: u64,
    /// Expected length of the block after decompression.
    #[serde(rename = "decompressedLength")]
    pub decompressed_length: u64,
}

/// A node type: its label and how many nodes of that type the graph holds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeEntry {
    /// Label shared by every node of this type.
    #[serde(rename = "nodeLabel")]
    pub node_label: String,
    /// Number of nodes allocated for this type.
    pub nnodes: usize,
}

/// An edge type: the adjacency lists owned by one node type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EdgeEntry {
    /// Label shared by every edge of this type.
    #[serde(rename = "edgeLabel")]
    pub edge_label: String,
    /// Label of the node type that owns the adjacency lists.
    #[serde(rename = "nodeLabel")]
    pub node_label: String,
    /// Direction flag: 0 for incoming, 1 for outgoing.
    pub inout: u8,
    /// Per-node edge counts: one entry per owning node plus a trailing
    /// sentinel that is never consumed as a count.
    pub qty: StreamDescriptor,
    /// Destination references, one per edge.
    pub neighbors: StreamDescriptor,
    /// Optional per-edge property values, aligned 1:1 with `neighbors`.
    pub property: Option<StreamDescriptor>,
}

/// A node property type: per-node value counts plus the value stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyEntry {
    /// Name of the property.
    #[serde(rename = "propertyLabel")]
    pub property_label: String,
    /// Label of the node type the property belongs to.
    #[serde(rename = "nodeLabel")]
    pub node_label: String,
    /// Per-node value counts; same sentinel rule as edge quantities.
    pub qty: StreamDescriptor,
    /// The property values, typed per the descriptor.
    pub property: StreamDescriptor,
}

/// The container's metadata manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    /// Byte length of each string pool entry, in handle order.
    #[serde(rename = "stringPoolLength")]
    pub string_pool_length: StreamDescriptor,
    /// Every string pool entry concatenated, in handle order.
    #[serde(rename = "stringPoolBytes")]
    pub string_pool_bytes: StreamDescriptor,
    /// Node types in enumeration order; positions here are the type indices
    /// used by `ref` streams.
    pub nodes: Vec<NodeEntry>,
    /// Edge types.
    pub edges: Vec<EdgeEntry>,
    /// Node property types.
    pub properties: Vec<PropertyEntry>,
}
