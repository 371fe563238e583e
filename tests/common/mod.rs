//! Shared fixture writer for integration tests.
//!
//! The library is strictly read-only, so tests synthesize containers by hand
//! with the same layout the reader expects: the 16-byte header, zstd stream
//! blocks, and a trailing JSON manifest.

#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::{Value, json};

/// The signature every container starts with.
pub const MAGIC: &[u8; 8] = b"FLT GRPH";

/// Accumulates compressed stream blocks, then emits the final container
/// bytes with a manifest assembled by the caller.
pub struct ContainerBuilder {
    body: Vec<u8>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    /// Compresses `raw` as one stream block and returns its descriptor.
    pub fn stream(&mut self, kind: &str, raw: &[u8]) -> Value {
        let compressed = zstd::encode_all(raw, 0).unwrap();
        let start_offset = 16 + self.body.len();
        self.body.extend_from_slice(&compressed);
        json!({
            "type": kind,
            "startOffset": start_offset,
            "compressedLength": compressed.len(),
            "decompressedLength": raw.len(),
        })
    }

    /// An `int` stream of little-endian `u32` values.
    pub fn ints(&mut self, values: &[u32]) -> Value {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.stream("int", &bytes)
    }

    /// A `string` stream of pool handles.
    pub fn string_handles(&mut self, handles: &[u32]) -> Value {
        let bytes: Vec<u8> = handles.iter().flat_map(|h| h.to_le_bytes()).collect();
        self.stream("string", &bytes)
    }

    /// A `bool` stream, one byte per value.
    pub fn bools(&mut self, values: &[bool]) -> Value {
        let bytes: Vec<u8> = values.iter().map(|&v| u8::from(v)).collect();
        self.stream("bool", &bytes)
    }

    /// A `ref` stream of (node index, node-type index) pairs.
    pub fn refs(&mut self, pairs: &[(u32, u32)]) -> Value {
        let mut bytes = Vec::with_capacity(pairs.len() * 8);
        for &(index, type_index) in pairs {
            bytes.extend_from_slice(&index.to_le_bytes());
            bytes.extend_from_slice(&type_index.to_le_bytes());
        }
        self.stream("ref", &bytes)
    }

    /// The two string pool streams: per-entry lengths and concatenated
    /// bytes. Returns `(lengths, bytes)` descriptors.
    pub fn pool(&mut self, strings: &[&str]) -> (Value, Value) {
        let lengths: Vec<u32> = strings.iter().map(|s| s.len() as u32).collect();
        let bytes = strings.concat().into_bytes();
        let lengths_descriptor = self.ints(&lengths);
        let bytes_descriptor = self.stream("byte", &bytes);
        (lengths_descriptor, bytes_descriptor)
    }

    /// Finalizes the container: header, stream blocks, then the manifest.
    pub fn finish(self, manifest: &Value) -> Vec<u8> {
        let manifest_offset = (16 + self.body.len()) as u64;
        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&manifest_offset.to_le_bytes());
        out.extend_from_slice(&self.body);
        out.extend_from_slice(manifest.to_string().as_bytes());
        out
    }
}

/// A minimal but complete container: one `FILE` node type with two nodes,
/// one outgoing `AST` edge from node 0 to node 1, a `NAME` property for
/// both nodes, and a two-entry string pool.
pub fn minimal_container() -> Vec<u8> {
    let mut builder = ContainerBuilder::new();
    let (pool_lengths, pool_bytes) = builder.pool(&["main.cpp", "util.cpp"]);
    let edge_qty = builder.ints(&[1, 0, 0]);
    let neighbors = builder.refs(&[(1, 0)]);
    let name_qty = builder.ints(&[1, 1, 0]);
    let name_values = builder.string_handles(&[0, 1]);

    builder.finish(&json!({
        "stringPoolLength": pool_lengths,
        "stringPoolBytes": pool_bytes,
        "nodes": [{"nodeLabel": "FILE", "nnodes": 2}],
        "edges": [{
            "edgeLabel": "AST",
            "nodeLabel": "FILE",
            "inout": 1,
            "qty": edge_qty,
            "neighbors": neighbors,
            "property": null
        }],
        "properties": [{
            "propertyLabel": "NAME",
            "nodeLabel": "FILE",
            "qty": name_qty,
            "property": name_values
        }]
    }))
}

/// Writes container bytes to a fresh temporary file.
///
/// The `TempDir` must be kept alive for as long as the file is used.
pub fn write_container(bytes: &[u8]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.fg");
    std::fs::write(&path, bytes).unwrap();
    (dir, path)
}
