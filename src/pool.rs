//! String pool reconstruction.

use crate::codec::{self, GraphSource};
use crate::error::DeserializationError;
use crate::manifest::{Manifest, StreamKind};

/// The ordered table of all text values referenced by handle.
///
/// A handle is a 32-bit position in this table. The pool is built from two
/// streams: a length stream holding one byte count per entry, and a byte
/// stream holding every entry concatenated in handle order. That order is
/// the handle-to-string mapping used everywhere else in the container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringPool {
    strings: Vec<String>,
}

impl StringPool {
    /// Decodes the pool from its two manifest streams.
    pub(crate) fn read(
        file: &mut dyn GraphSource,
        manifest: &Manifest,
    ) -> Result<Self, DeserializationError> {
        let length_bytes = codec::read_block(file, &manifest.string_pool_length)?;
        let lengths = codec::decode_u32s(&length_bytes, StreamKind::Int)?;
        let bytes = codec::read_block(file, &manifest.string_pool_bytes)?;
        Self::from_parts(&lengths, &bytes)
    }

    /// Slices `bytes` into strings using a running offset over `lengths`.
    ///
    /// # Errors
    ///
    /// [`DeserializationError::PoolLengthMismatch`] if the lengths do not
    /// sum to the byte stream's size, and
    /// [`DeserializationError::InvalidString`] if an entry is not UTF-8.
    pub(crate) fn from_parts(
        lengths: &[u32],
        bytes: &[u8],
    ) -> Result<Self, DeserializationError> {
        let total: usize = lengths.iter().map(|&length| length as usize).sum();
        if total != bytes.len() {
            return Err(DeserializationError::PoolLengthMismatch {
                lengths_total: total,
                bytes_length: bytes.len(),
            });
        }

        let mut strings = Vec::with_capacity(lengths.len());
        let mut offset = 0usize;
        for &length in lengths {
            let end = offset + length as usize;
            strings.push(String::from_utf8(bytes[offset..end].to_vec())?);
            offset = end;
        }
        Ok(Self { strings })
    }

    /// Looks up a handle, returning `None` for out-of-range (deleted)
    /// handles.
    pub fn get(&self, handle: u32) -> Option<&str> {
        self.strings.get(handle as usize).map(String::as_str)
    }

    /// Number of strings in the pool.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the pool holds no strings.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// The strings in handle order.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }
}
