//! Read-only access to flat graph databases.
//!
//! A flat graph database is a self-describing binary container holding a
//! labeled, directed property graph — typically a code property graph — as
//! three layers:
//!
//! - a fixed 16-byte header: the magic signature [`MAGIC_BYTES`] followed by
//!   a little-endian `u64` manifest offset,
//! - a JSON manifest describing the location, size, and logical type of
//!   every stream in the file,
//! - a set of independently zstd-compressed streams, each one flat array of
//!   `bool`, `int`, `string`-handle, node-`ref`, or raw `byte` elements.
//!
//! [`FlatGraph`] owns the underlying file or stream exclusively and
//! deserializes the manifest, the string pool, and the reconstructed schema
//! lazily, caching each for the container's lifetime. All access is
//! synchronous and single-threaded; the container performs no internal
//! locking.
//!
//! # Quick start
//!
//! ```no_run
//! use flatgraph::FlatGraph;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut graph = FlatGraph::open("program.fg")?;
//!
//!     let schema = graph.schema()?;
//!     for file in schema.nodes("FILE")? {
//!         println!("{}: {} edges", file.label(), file.edges().len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Reconstruction model
//!
//! Nodes are materialized into one arena per node type, in manifest order;
//! everything else addresses them by [`NodeRef`] — the node type's position
//! in the manifest plus the node's ordinal index within its type. Edges and
//! properties are recovered by walking per-node quantity streams against
//! neighbor/value streams; see [`Schema`] for the exact rules.
//!
//! Writing is out of scope: open modes other than [`OpenMode::Read`] fail
//! up front rather than silently downgrading.

mod builder;
mod codec;
mod error;
mod graph;
mod header;
mod manifest;
mod pool;
mod schema;
mod view;

pub use builder::{FlatGraphBuilder, OpenMode};
pub use codec::{DecodedStream, NodeRef};
pub use error::{DeserializationError, FormatError, GraphError, LookupError};
pub use graph::FlatGraph;
pub use header::{HEADER_SIZE, Header, MAGIC_BYTES};
pub use manifest::{
    EdgeEntry, Manifest, NodeEntry, PropertyEntry, StreamDescriptor, StreamKind,
};
pub use pool::StringPool;
pub use schema::{Direction, Edge, Node, Property, PropertyValue, Schema};
pub use view::NodeView;
