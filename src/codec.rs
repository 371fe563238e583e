//! The typed stream codec: decompression plus binary decoding of stream
//! blocks.
//!
//! Every compressed region referenced by the manifest passes through this
//! module. It is the single point where the block compression and the
//! little-endian element layout are interpreted; everything above it works
//! with decoded values.

use std::io::{Read, Seek, SeekFrom};

use crate::error::DeserializationError;
use crate::manifest::{StreamDescriptor, StreamKind};
use crate::pool::StringPool;

/// The byte source backing an open container: any seekable reader.
pub(crate) trait GraphSource: Read + Seek {}

impl<T: Read + Seek> GraphSource for T {}

/// A non-owning reference to a node.
///
/// Nodes live in one arena per node type; a reference addresses them by the
/// type's position in the manifest plus the node's ordinal index within that
/// type. This is how `ref` streams encode endpoints on disk, and how edges
/// hold them in memory — no owning pointers, so cyclic graphs need no
/// special handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    /// Ordinal index of the node within its type.
    pub index: u32,
    /// Position of the node's type in the manifest's node list.
    pub type_index: u32,
}

/// The decoded contents of one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedStream {
    /// One boolean per byte.
    Bool(Vec<bool>),
    /// Little-endian `u32` elements.
    Int(Vec<u32>),
    /// Pool-resolved strings, with deleted handles already dropped.
    String(Vec<String>),
    /// Node references.
    Ref(Vec<NodeRef>),
    /// Raw decompressed bytes, unchanged.
    Byte(Vec<u8>),
}

impl DecodedStream {
    /// Number of decoded elements (bytes, for a byte stream).
    pub fn len(&self) -> usize {
        match self {
            DecodedStream::Bool(v) => v.len(),
            DecodedStream::Int(v) => v.len(),
            DecodedStream::String(v) => v.len(),
            DecodedStream::Ref(v) => v.len(),
            DecodedStream::Byte(v) => v.len(),
        }
    }

    /// Whether the stream decoded to no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads and decompresses the block described by `descriptor`.
///
/// Seeks to the block's start offset, reads exactly its compressed length
/// (fewer available bytes is [`DeserializationError::TruncatedStream`]),
/// and decompresses the whole block — blocks are not seekable mid-stream.
/// The result must match the descriptor's decompressed length exactly.
pub(crate) fn read_block(
    file: &mut dyn GraphSource,
    descriptor: &StreamDescriptor,
) -> Result<Vec<u8>, DeserializationError> {
    file.seek(SeekFrom::Start(descriptor.start_offset))?;

    let compressed_length = descriptor.compressed_length as usize;
    let mut compressed = vec![0u8; compressed_length];
    let mut filled = 0;
    while filled < compressed_length {
        let n = file.read(&mut compressed[filled..])?;
        if n == 0 {
            return Err(DeserializationError::TruncatedStream {
                expected: compressed_length,
                found: filled,
            });
        }
        filled += n;
    }

    let decompressed = zstd::stream::decode_all(compressed.as_slice())
        .map_err(DeserializationError::Decompression)?;

    let expected = descriptor.decompressed_length as usize;
    if decompressed.len() != expected {
        return Err(DeserializationError::LengthMismatch {
            expected,
            found: decompressed.len(),
        });
    }
    Ok(decompressed)
}

/// Decodes a decompressed block as little-endian `u32` elements.
pub(crate) fn decode_u32s(
    bytes: &[u8],
    kind: StreamKind,
) -> Result<Vec<u32>, DeserializationError> {
    if bytes.len() % 4 != 0 {
        return Err(DeserializationError::MisalignedStream {
            kind,
            length: bytes.len(),
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes(chunk.try_into().unwrap()))
        .collect())
}

fn decode_bools(bytes: &[u8]) -> Vec<bool> {
    bytes.iter().map(|byte| *byte != 0).collect()
}

fn decode_refs(bytes: &[u8]) -> Result<Vec<NodeRef>, DeserializationError> {
    if bytes.len() % 8 != 0 {
        return Err(DeserializationError::MisalignedStream {
            kind: StreamKind::Ref,
            length: bytes.len(),
        });
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|chunk| NodeRef {
            index: u32::from_le_bytes(chunk[0..4].try_into().unwrap()),
            type_index: u32::from_le_bytes(chunk[4..8].try_into().unwrap()),
        })
        .collect())
}

/// Decodes handles and resolves them through the pool.
///
/// Deleted entries are stored as `u32::MAX`; any handle at or past the
/// pool's end is treated the same way and silently dropped before lookup.
fn decode_strings(
    bytes: &[u8],
    pool: &StringPool,
) -> Result<Vec<String>, DeserializationError> {
    let handles = decode_u32s(bytes, StreamKind::String)?;
    let strings: Vec<String> = handles
        .iter()
        .filter_map(|&handle| pool.get(handle).map(str::to_owned))
        .collect();

    #[cfg(feature = "logging")]
    {
        let dropped = handles.len() - strings.len();
        if dropped > 0 {
            log::debug!("discarded {dropped} out-of-range string handles");
        }
    }

    Ok(strings)
}

/// Decodes the stream described by `descriptor` into its logical type.
pub(crate) fn decode(
    file: &mut dyn GraphSource,
    descriptor: &StreamDescriptor,
    pool: &StringPool,
) -> Result<DecodedStream, DeserializationError> {
    let bytes = read_block(file, descriptor)?;
    match descriptor.kind {
        StreamKind::Bool => Ok(DecodedStream::Bool(decode_bools(&bytes))),
        StreamKind::Int => Ok(DecodedStream::Int(decode_u32s(&bytes, StreamKind::Int)?)),
        StreamKind::String => Ok(DecodedStream::String(decode_strings(&bytes, pool)?)),
        StreamKind::Ref => Ok(DecodedStream::Ref(decode_refs(&bytes)?)),
        StreamKind::Byte => Ok(DecodedStream::Byte(bytes)),
    }
}
