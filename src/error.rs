//! Error types surfaced while opening and decoding flat graph databases.

use std::fmt;
use std::io;
use std::string::FromUtf8Error;

use crate::builder::OpenMode;
use crate::codec::NodeRef;
use crate::manifest::StreamKind;

/// Errors caused by caller misuse of the open surface.
#[derive(Debug)]
pub enum FormatError {
    /// Neither a file path nor a reader was supplied.
    MissingSource,
    /// The requested open mode is not implemented; only reading is supported.
    UnsupportedMode(OpenMode),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::MissingSource => {
                write!(
                    f,
                    "nothing to open: pass a file path or an open reader to the builder"
                )
            }
            FormatError::UnsupportedMode(mode) => {
                write!(f, "open mode {mode:?} is not implemented; only Read is supported")
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Errors raised when the container's contents violate a structural invariant.
///
/// These indicate a corrupt or truncated file, never a transient condition;
/// no operation is retried after one is returned.
#[derive(Debug)]
pub enum DeserializationError {
    /// An I/O failure while reading from the container.
    Io(io::Error),
    /// The file ended before the fixed 16-byte header could be read.
    TruncatedHeader {
        /// Bytes the header requires.
        expected: usize,
        /// Bytes actually available.
        found: usize,
    },
    /// The magic signature at the start of the file did not match.
    MagicMismatch {
        /// The signature every container starts with.
        expected: [u8; 8],
        /// The bytes actually found.
        found: [u8; 8],
    },
    /// The manifest JSON could not be deserialized.
    Manifest(serde_json::Error),
    /// A compressed block ended before its declared length.
    TruncatedStream {
        /// Compressed length recorded in the manifest.
        expected: usize,
        /// Bytes actually read.
        found: usize,
    },
    /// A block failed to decompress.
    Decompression(io::Error),
    /// A decompressed block did not match the length recorded in the manifest.
    LengthMismatch {
        /// Decompressed length recorded in the manifest.
        expected: usize,
        /// Length actually produced.
        found: usize,
    },
    /// A stream's byte length is not a multiple of its element width.
    MisalignedStream {
        /// Logical type of the stream.
        kind: StreamKind,
        /// Decompressed length that failed the alignment check.
        length: usize,
    },
    /// The string pool's length entries do not cover its byte stream.
    PoolLengthMismatch {
        /// Sum of all entries in the length stream.
        lengths_total: usize,
        /// Decompressed length of the byte stream.
        bytes_length: usize,
    },
    /// A string pool entry is not valid UTF-8.
    InvalidString(FromUtf8Error),
    /// An edge entry carries a direction flag other than 0 or 1.
    InvalidDirection(u8),
    /// A stream has a logical type unusable in its manifest position.
    UnexpectedStreamKind {
        /// Label of the edge or property entry referencing the stream.
        label: String,
        /// The unusable logical type.
        kind: StreamKind,
    },
    /// A quantity stream does not hold one entry per owning node plus the
    /// trailing sentinel.
    QuantityMismatch {
        /// Label of the edge or property entry.
        label: String,
        /// Entries the owning type requires (node count + 1).
        expected: usize,
        /// Entries actually decoded.
        found: usize,
    },
    /// A neighbor or value stream ended while entries remained to consume.
    StreamExhausted {
        /// Label of the edge or property entry.
        label: String,
        /// Index of the first entry that could not be consumed.
        index: usize,
        /// Entries actually available.
        available: usize,
    },
    /// An edge references a node outside the schema's arenas.
    InvalidNodeRef {
        /// Label of the edge entry.
        label: String,
        /// The dangling reference.
        reference: NodeRef,
    },
}

impl fmt::Display for DeserializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeserializationError::Io(e) => write!(f, "I/O error: {e}"),
            DeserializationError::TruncatedHeader { expected, found } => {
                write!(
                    f,
                    "corrupted file: expected at least {expected} header bytes, but only found {found}"
                )
            }
            DeserializationError::MagicMismatch { expected, found } => {
                write!(
                    f,
                    "corrupted file: expected magic {expected:02x?}, but found {found:02x?} instead"
                )
            }
            DeserializationError::Manifest(e) => write!(f, "malformed manifest: {e}"),
            DeserializationError::TruncatedStream { expected, found } => {
                write!(
                    f,
                    "unexpected end of file in a compressed stream: expected {expected} bytes, \
                     but only {found} bytes were read"
                )
            }
            DeserializationError::Decompression(e) => {
                write!(f, "failed to decompress stream: {e}")
            }
            DeserializationError::LengthMismatch { expected, found } => {
                write!(
                    f,
                    "decompressed stream holds {found} bytes, but the manifest records {expected}"
                )
            }
            DeserializationError::MisalignedStream { kind, length } => match kind.element_width() {
                Some(width) => write!(
                    f,
                    "{kind} stream length {length} is not a multiple of its {width}-byte element width"
                ),
                None => write!(f, "{kind} stream length {length} failed the alignment check"),
            },
            DeserializationError::PoolLengthMismatch {
                lengths_total,
                bytes_length,
            } => {
                write!(
                    f,
                    "corrupt string pool: length entries sum to {lengths_total} bytes, \
                     but the byte stream holds {bytes_length}"
                )
            }
            DeserializationError::InvalidString(e) => {
                write!(f, "string pool entry is not valid UTF-8: {e}")
            }
            DeserializationError::InvalidDirection(flag) => {
                write!(f, "invalid edge direction flag {flag}; expected 0 or 1")
            }
            DeserializationError::UnexpectedStreamKind { label, kind } => {
                write!(f, "stream for '{label}' has unusable logical type {kind}")
            }
            DeserializationError::QuantityMismatch {
                label,
                expected,
                found,
            } => {
                write!(
                    f,
                    "quantity stream for '{label}' holds {found} entries, expected {expected}"
                )
            }
            DeserializationError::StreamExhausted {
                label,
                index,
                available,
            } => {
                write!(
                    f,
                    "stream for '{label}' exhausted: entry {index} requested, \
                     but only {available} are available"
                )
            }
            DeserializationError::InvalidNodeRef { label, reference } => {
                write!(
                    f,
                    "edge stream for '{label}' references node ({}, {}) outside the schema",
                    reference.index, reference.type_index
                )
            }
        }
    }
}

impl std::error::Error for DeserializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeserializationError::Io(e) | DeserializationError::Decompression(e) => Some(e),
            DeserializationError::Manifest(e) => Some(e),
            DeserializationError::InvalidString(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DeserializationError {
    fn from(err: io::Error) -> Self {
        DeserializationError::Io(err)
    }
}

impl From<FromUtf8Error> for DeserializationError {
    fn from(err: FromUtf8Error) -> Self {
        DeserializationError::InvalidString(err)
    }
}

/// A requested node-type label does not exist in the manifest.
#[derive(Debug)]
pub enum LookupError {
    /// The manifest defines no node type with this label.
    UnknownNodeType(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::UnknownNodeType(label) => {
                write!(f, "node type '{label}' does not exist in the manifest")
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// Umbrella error for operations that can fail in more than one category.
#[derive(Debug)]
pub enum GraphError {
    /// Caller misuse of the open surface.
    Format(FormatError),
    /// The container's contents violate a structural invariant.
    Deserialization(DeserializationError),
    /// A requested label does not exist.
    Lookup(LookupError),
    /// An I/O error occurred.
    Io(io::Error),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::Format(e) => write!(f, "{e}"),
            GraphError::Deserialization(e) => write!(f, "{e}"),
            GraphError::Lookup(e) => write!(f, "{e}"),
            GraphError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphError::Format(e) => Some(e),
            GraphError::Deserialization(e) => Some(e),
            GraphError::Lookup(e) => Some(e),
            GraphError::Io(e) => Some(e),
        }
    }
}

impl From<FormatError> for GraphError {
    fn from(err: FormatError) -> Self {
        GraphError::Format(err)
    }
}

impl From<DeserializationError> for GraphError {
    fn from(err: DeserializationError) -> Self {
        GraphError::Deserialization(err)
    }
}

impl From<LookupError> for GraphError {
    fn from(err: LookupError) -> Self {
        GraphError::Lookup(err)
    }
}

impl From<io::Error> for GraphError {
    fn from(err: io::Error) -> Self {
        GraphError::Io(err)
    }
}
