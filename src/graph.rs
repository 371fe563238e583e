//! The opened container: lazy, cached access to manifest, pool, and schema.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::builder::FlatGraphBuilder;
use crate::codec::{self, DecodedStream, GraphSource};
use crate::error::{DeserializationError, GraphError};
use crate::header::{HEADER_SIZE, Header};
use crate::manifest::{Manifest, StreamDescriptor};
use crate::pool::StringPool;
use crate::schema::Schema;

/// An open flat graph database.
///
/// The container owns its underlying file or stream exclusively and releases
/// it exactly once — when dropped, on every exit path, or explicitly through
/// [`FlatGraph::close`]. The manifest, string pool, and schema are each
/// deserialized on first access and cached for the container's lifetime; a
/// failed build is not cached, and callers must treat a schema error as
/// making this instance's schema permanently unusable.
///
/// Accessors take `&mut self`: the caches and the stream cursor are shared
/// mutable state, and the container performs no internal locking. Wrap the
/// container in external synchronization before sharing it across threads.
pub struct FlatGraph {
    path: Option<PathBuf>,
    source: Box<dyn GraphSource>,
    manifest: Option<Manifest>,
    pool: Option<StringPool>,
    schema: Option<Schema>,
}

impl FlatGraph {
    /// Opens the container at `path` for reading.
    ///
    /// Equivalent to `FlatGraph::builder().path(path).open()`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        FlatGraphBuilder::new().path(path).open()
    }

    /// Returns a builder for configuring how a container is opened.
    pub fn builder() -> FlatGraphBuilder {
        FlatGraphBuilder::new()
    }

    pub(crate) fn from_parts(source: Box<dyn GraphSource>, path: Option<PathBuf>) -> Self {
        Self {
            path,
            source,
            manifest: None,
            pool: None,
            schema: None,
        }
    }

    /// The path this container was opened from, when known.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The container's manifest, read on first call and cached.
    ///
    /// The manifest's offset lives in the fixed header: the first 16 bytes
    /// of the file are the 8-byte magic signature immediately followed by a
    /// little-endian `u64` holding the manifest's absolute offset.
    pub fn manifest(&mut self) -> Result<&Manifest, DeserializationError> {
        if self.manifest.is_none() {
            let manifest = Self::read_manifest(&mut *self.source)?;
            self.manifest = Some(manifest);
        }
        Ok(self.manifest.as_ref().unwrap())
    }

    fn read_manifest(source: &mut dyn GraphSource) -> Result<Manifest, DeserializationError> {
        source.seek(SeekFrom::Start(0))?;
        let mut header_bytes = [0u8; HEADER_SIZE];
        let mut filled = 0;
        while filled < HEADER_SIZE {
            let n = source.read(&mut header_bytes[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        let header = Header::from_bytes(&header_bytes[..filled])?;

        source.seek(SeekFrom::Start(header.manifest_offset))?;
        let mut manifest_bytes = Vec::new();
        source.read_to_end(&mut manifest_bytes)?;
        serde_json::from_slice(&manifest_bytes).map_err(DeserializationError::Manifest)
    }

    /// The container's string pool, built on first call and cached.
    pub fn pool(&mut self) -> Result<&StringPool, DeserializationError> {
        if self.pool.is_none() {
            self.manifest()?;
            let manifest = self.manifest.as_ref().unwrap();
            let pool = StringPool::read(&mut *self.source, manifest)?;
            self.pool = Some(pool);
        }
        Ok(self.pool.as_ref().unwrap())
    }

    /// The reconstructed graph, built exactly once on first call and cached.
    pub fn schema(&mut self) -> Result<&Schema, GraphError> {
        if self.schema.is_none() {
            self.manifest()?;
            self.pool()?;
            let manifest = self.manifest.as_ref().unwrap();
            let pool = self.pool.as_ref().unwrap();
            let schema = Schema::build(&mut *self.source, manifest, pool)?;
            self.schema = Some(schema);
        }
        Ok(self.schema.as_ref().unwrap())
    }

    /// Decodes one stream referenced by the manifest into its logical type.
    ///
    /// Ensures the string pool is loaded first, since `string` streams
    /// resolve their handles through it.
    pub fn decode(
        &mut self,
        descriptor: &StreamDescriptor,
    ) -> Result<DecodedStream, DeserializationError> {
        self.pool()?;
        let pool = self.pool.as_ref().unwrap();
        codec::decode(&mut *self.source, descriptor, pool)
    }

    /// Closes the container, releasing the underlying file or stream.
    ///
    /// Dropping the container has the same effect; `close` only makes the
    /// release explicit at the call site. Consuming `self` makes a double
    /// close unrepresentable.
    pub fn close(self) {}
}

impl fmt::Debug for FlatGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatGraph")
            .field("path", &self.path)
            .field("manifest_loaded", &self.manifest.is_some())
            .field("pool_loaded", &self.pool.is_some())
            .field("schema_built", &self.schema.is_some())
            .finish()
    }
}
