//! # flatgraph-ast
//!
//! Syntax-tree traversal over flat graph databases.
//!
//! This crate provides a thin, read-only layer over the `flatgraph` core for
//! the most common consumer of a code property graph: walking the abstract
//! syntax tree. A [`SyntaxTree`] opens (or wraps) a container and locates
//! the `FILE` node for one source file; a [`Cursor`] then navigates the
//! outgoing `AST` edges from node to node.
//!
//! ## Quick start
//!
//! ```no_run
//! use flatgraph_ast::SyntaxTree;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tree = SyntaxTree::open("program.fg", "main.cpp")?;
//!
//! let root = tree.cursor()?;
//! for child in root.children() {
//!     println!("{}", child.label());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! This crate does **not** implement graph algorithms or any whole-graph
//! analysis. Cursors are lazy lenses evaluated node by node: children are
//! computed on first access and cached per cursor instance, so repeated
//! navigation over the same subtree is cheap.

#![deny(missing_docs)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cursor;
pub mod labels;
pub mod tree;

pub use cursor::{Cursor, cursor};
pub use tree::{SyntaxTree, SyntaxTreeError};
