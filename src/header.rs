//! The fixed container header: magic signature plus manifest offset.

use crate::error::DeserializationError;

/// Magic signature identifying a flat graph database file.
pub const MAGIC_BYTES: [u8; 8] = *b"FLT GRPH";

/// Size of the fixed header in bytes.
///
/// The header is the 8-byte magic signature immediately followed by a
/// little-endian `u64` holding the absolute byte offset of the manifest.
pub const HEADER_SIZE: usize = 16;

/// The parsed fixed header of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Absolute byte offset of the manifest within the file.
    pub manifest_offset: u64,
}

impl Header {
    /// Parses the header from the first bytes of a container.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializationError::TruncatedHeader`] if fewer than
    /// [`HEADER_SIZE`] bytes are supplied, and
    /// [`DeserializationError::MagicMismatch`] (reporting both the expected
    /// and the found signature) if the magic bytes do not match.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DeserializationError> {
        if data.len() < HEADER_SIZE {
            return Err(DeserializationError::TruncatedHeader {
                expected: HEADER_SIZE,
                found: data.len(),
            });
        }

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&data[0..8]);
        if magic != MAGIC_BYTES {
            return Err(DeserializationError::MagicMismatch {
                expected: MAGIC_BYTES,
                found: magic,
            });
        }

        let manifest_offset = u64::from_le_bytes(data[8..16].try_into().unwrap());
        Ok(Self { manifest_offset })
    }
}
