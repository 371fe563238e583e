//! Well-known labels of code property graphs.
//!
//! Only the labels this crate itself consumes are listed; graphs routinely
//! define many more node and edge types, all reachable through the core
//! schema API.

/// Node type representing one source file.
pub const FILE: &str = "FILE";

/// Edge label linking a syntax element to its children in the syntax tree.
pub const AST: &str = "AST";

/// Property holding an element's name (for `FILE` nodes, the file path).
pub const NAME: &str = "NAME";

/// Property holding an element's source text.
pub const CODE: &str = "CODE";
