//! Builder for configuring and opening a flat graph database.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use crate::codec::GraphSource;
use crate::error::{FormatError, GraphError};
use crate::graph::FlatGraph;

/// How a container should be opened.
///
/// Only [`OpenMode::Read`] is implemented. The other modes exist so callers
/// that request them fail with an explicit "not implemented" error instead
/// of silently opening the file read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Open an existing container for reading.
    #[default]
    Read,
    /// Truncate and write a new container. Not implemented.
    Write,
    /// Append to an existing container. Not implemented.
    Append,
    /// Exclusively create a new container. Not implemented.
    CreateNew,
}

/// Builder for configuring and opening a flat graph database.
///
/// # Example
///
/// ```no_run
/// use flatgraph::FlatGraph;
///
/// # fn main() -> Result<(), flatgraph::GraphError> {
/// let graph = FlatGraph::builder().path("program.fg").open()?;
/// # Ok(())
/// # }
/// ```
pub struct FlatGraphBuilder {
    path: Option<PathBuf>,
    reader: Option<Box<dyn GraphSource>>,
    mode: OpenMode,
}

impl FlatGraphBuilder {
    /// Creates a new builder with default settings (read mode, no source).
    pub fn new() -> Self {
        Self {
            path: None,
            reader: None,
            mode: OpenMode::Read,
        }
    }

    /// Sets the file path to open.
    #[must_use]
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Supplies an already-open byte stream instead of a path.
    ///
    /// A supplied reader takes precedence over a path; the path is then only
    /// recorded for diagnostics.
    #[must_use]
    pub fn reader(mut self, reader: impl Read + Seek + 'static) -> Self {
        self.reader = Some(Box::new(reader));
        self
    }

    /// Sets the open mode.
    ///
    /// Default: [`OpenMode::Read`], the only mode that is implemented.
    #[must_use]
    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    /// Opens the database.
    ///
    /// # Errors
    ///
    /// [`FormatError::UnsupportedMode`] for any mode other than read,
    /// [`FormatError::MissingSource`] when neither a path nor a reader was
    /// supplied, and [`GraphError::Io`] when the file cannot be opened.
    pub fn open(self) -> Result<FlatGraph, GraphError> {
        if self.mode != OpenMode::Read {
            return Err(FormatError::UnsupportedMode(self.mode).into());
        }

        match (self.reader, self.path) {
            (Some(reader), path) => Ok(FlatGraph::from_parts(reader, path)),
            (None, Some(path)) => {
                let file = File::open(&path).map_err(GraphError::Io)?;
                Ok(FlatGraph::from_parts(Box::new(file), Some(path)))
            }
            (None, None) => Err(FormatError::MissingSource.into()),
        }
    }
}

impl Default for FlatGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
