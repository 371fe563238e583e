//! Schema reconstruction: materializing nodes, edges, and properties from
//! the manifest's flat streams.
//!
//! This is the central algorithm of the crate. Nodes are allocated into one
//! arena per node type, in manifest order; edges and properties are then
//! recovered by walking per-node quantity streams against the neighbor and
//! value streams, consuming entries in order. Enumeration order is
//! load-bearing: `ref` streams address nodes by (type index, ordinal index),
//! so the arenas must be built exactly as the manifest enumerates them.

use std::collections::HashMap;
use std::sync::Arc;

use crate::codec::{self, DecodedStream, GraphSource, NodeRef};
use crate::error::{DeserializationError, GraphError, LookupError};
use crate::manifest::{EdgeEntry, Manifest, PropertyEntry, StreamDescriptor};
use crate::pool::StringPool;

/// Adjacency-list ownership flag carried by every edge.
///
/// The flag records which side of the edge owns the adjacency list it was
/// read from, not just geometric direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The owning node is the edge's destination (flag 0).
    Incoming,
    /// The owning node is the edge's source (flag 1).
    Outgoing,
}

impl Direction {
    pub(crate) fn from_flag(flag: u8) -> Result<Self, DeserializationError> {
        match flag {
            0 => Ok(Direction::Incoming),
            1 => Ok(Direction::Outgoing),
            other => Err(DeserializationError::InvalidDirection(other)),
        }
    }
}

/// A single scalar property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// A boolean, from a `bool` stream.
    Bool(bool),
    /// An unsigned 32-bit integer, from an `int` stream.
    Int(u32),
    /// A pool-resolved string, from a `string` stream.
    String(String),
}

/// A node attribute holding either one value or an ordered list.
///
/// Cardinality is decided dynamically while the schema is built: the first
/// value written under a name is stored as a scalar, and a second write
/// promotes the slot to a list that preserves insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// Exactly one value.
    Scalar(PropertyValue),
    /// Two or more values, in insertion order.
    List(Vec<PropertyValue>),
}

impl Property {
    fn push(&mut self, value: PropertyValue) {
        match std::mem::replace(self, Property::List(Vec::new())) {
            Property::Scalar(first) => *self = Property::List(vec![first, value]),
            Property::List(mut values) => {
                values.push(value);
                *self = Property::List(values);
            }
        }
    }
}

/// A directed labeled edge.
///
/// Both endpoints are non-owning [`NodeRef`]s into the schema's arenas. The
/// edge itself lives in the adjacency list of the node that owns it — the
/// node the quantity stream was keyed by — which is always the `source`
/// side here, regardless of the direction flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    label: Arc<str>,
    source: NodeRef,
    destination: NodeRef,
    direction: Direction,
    property: Option<PropertyValue>,
}

impl Edge {
    /// The edge's type label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The owning endpoint.
    pub fn source(&self) -> NodeRef {
        self.source
    }

    /// The neighboring endpoint.
    pub fn destination(&self) -> NodeRef {
        self.destination
    }

    /// Which side owns the adjacency list this edge was read from.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The edge's single optional property value.
    pub fn property(&self) -> Option<&PropertyValue> {
        self.property.as_ref()
    }
}

/// A graph vertex: its type label, owned edges, and property map.
///
/// Nodes are allocated once per type at schema-build time and never resized.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    label: Arc<str>,
    edges: Vec<Edge>,
    properties: HashMap<String, Property>,
}

impl Node {
    fn new(label: Arc<str>) -> Self {
        Self {
            label,
            edges: Vec::new(),
            properties: HashMap::new(),
        }
    }

    /// The node's type label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The edges attached to this node's adjacency lists, both directions.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The node's property map.
    pub fn properties(&self) -> &HashMap<String, Property> {
        &self.properties
    }

    /// Looks up one property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub(crate) fn add_property(&mut self, name: &str, value: PropertyValue) {
        match self.properties.get_mut(name) {
            Some(existing) => existing.push(value),
            None => {
                self.properties
                    .insert(name.to_owned(), Property::Scalar(value));
            }
        }
    }
}

/// The fully materialized graph: one node arena per type, plus the label
/// index.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    index: HashMap<String, usize>,
    nodes: Vec<Vec<Node>>,
}

impl Schema {
    /// Materializes the whole graph from the manifest's streams.
    ///
    /// Runs exactly once per container; the caller caches the result. Any
    /// error discards the partially built schema.
    pub(crate) fn build(
        file: &mut dyn GraphSource,
        manifest: &Manifest,
        pool: &StringPool,
    ) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(manifest.nodes.len());
        let mut nodes: Vec<Vec<Node>> = Vec::with_capacity(manifest.nodes.len());
        for (type_index, entry) in manifest.nodes.iter().enumerate() {
            let label: Arc<str> = Arc::from(entry.node_label.as_str());
            index.insert(entry.node_label.clone(), type_index);
            nodes.push(
                (0..entry.nnodes)
                    .map(|_| Node::new(Arc::clone(&label)))
                    .collect(),
            );
        }

        let mut schema = Schema { index, nodes };
        for entry in &manifest.edges {
            schema.attach_edges(file, entry, pool)?;
        }
        for entry in &manifest.properties {
            schema.attach_properties(file, entry, pool)?;
        }
        Ok(schema)
    }

    fn attach_edges(
        &mut self,
        file: &mut dyn GraphSource,
        entry: &EdgeEntry,
        pool: &StringPool,
    ) -> Result<(), GraphError> {
        let owner = self.type_index(&entry.node_label)?;
        let direction = Direction::from_flag(entry.inout)?;
        let label: Arc<str> = Arc::from(entry.edge_label.as_str());

        let counts = expect_counts(
            codec::decode(file, &entry.qty, pool)?,
            &entry.qty,
            &entry.edge_label,
        )?;
        let node_count = self.nodes[owner].len();
        if counts.len() != node_count + 1 {
            return Err(DeserializationError::QuantityMismatch {
                label: entry.edge_label.clone(),
                expected: node_count + 1,
                found: counts.len(),
            }
            .into());
        }

        let neighbors = match codec::decode(file, &entry.neighbors, pool)? {
            DecodedStream::Ref(refs) => refs,
            _ => {
                return Err(DeserializationError::UnexpectedStreamKind {
                    label: entry.edge_label.clone(),
                    kind: entry.neighbors.kind,
                }
                .into());
            }
        };

        let values = match &entry.property {
            Some(descriptor) => Some(property_values(
                codec::decode(file, descriptor, pool)?,
                descriptor,
                &entry.edge_label,
            )?),
            None => None,
        };

        // The final quantity entry is a sentinel, never a per-node count.
        let mut cursor = 0usize;
        for (ordinal, &count) in counts[..node_count].iter().enumerate() {
            let count = count as usize;
            let start = cursor;
            cursor += count;
            if cursor > neighbors.len() {
                return Err(DeserializationError::StreamExhausted {
                    label: entry.edge_label.clone(),
                    index: cursor,
                    available: neighbors.len(),
                }
                .into());
            }

            let source = NodeRef {
                index: ordinal as u32,
                type_index: owner as u32,
            };
            for offset in start..cursor {
                let destination = neighbors[offset];
                if self.resolve(destination).is_none() {
                    return Err(DeserializationError::InvalidNodeRef {
                        label: entry.edge_label.clone(),
                        reference: destination,
                    }
                    .into());
                }
                let property = match &values {
                    Some(values) => match values.get(offset) {
                        Some(value) => Some(value.clone()),
                        None => {
                            return Err(DeserializationError::StreamExhausted {
                                label: entry.edge_label.clone(),
                                index: offset,
                                available: values.len(),
                            }
                            .into());
                        }
                    },
                    None => None,
                };
                self.nodes[owner][ordinal].edges.push(Edge {
                    label: Arc::clone(&label),
                    source,
                    destination,
                    direction,
                    property,
                });
            }
        }
        Ok(())
    }

    fn attach_properties(
        &mut self,
        file: &mut dyn GraphSource,
        entry: &PropertyEntry,
        pool: &StringPool,
    ) -> Result<(), GraphError> {
        let owner = self.type_index(&entry.node_label)?;

        let counts = expect_counts(
            codec::decode(file, &entry.qty, pool)?,
            &entry.qty,
            &entry.property_label,
        )?;
        let node_count = self.nodes[owner].len();
        if counts.len() != node_count + 1 {
            return Err(DeserializationError::QuantityMismatch {
                label: entry.property_label.clone(),
                expected: node_count + 1,
                found: counts.len(),
            }
            .into());
        }

        let values = property_values(
            codec::decode(file, &entry.property, pool)?,
            &entry.property,
            &entry.property_label,
        )?;

        let available = values.len();
        let mut values = values.into_iter();
        let mut consumed = 0usize;
        for (ordinal, &count) in counts[..node_count].iter().enumerate() {
            let node = &mut self.nodes[owner][ordinal];
            for _ in 0..count {
                let Some(value) = values.next() else {
                    return Err(DeserializationError::StreamExhausted {
                        label: entry.property_label.clone(),
                        index: consumed,
                        available,
                    }
                    .into());
                };
                node.add_property(&entry.property_label, value);
                consumed += 1;
            }
        }
        Ok(())
    }

    /// Position of a node-type label in the manifest's enumeration order.
    pub fn type_index(&self, label: &str) -> Result<usize, LookupError> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| LookupError::UnknownNodeType(label.to_owned()))
    }

    /// All nodes of the given type, in ordinal order.
    pub fn nodes(&self, label: &str) -> Result<&[Node], LookupError> {
        Ok(&self.nodes[self.type_index(label)?])
    }

    /// The label-to-type-index map.
    pub fn label_index(&self) -> &HashMap<String, usize> {
        &self.index
    }

    /// The node arenas, in type order.
    pub fn nodes_by_type(&self) -> &[Vec<Node>] {
        &self.nodes
    }

    /// Resolves a reference to the node it addresses.
    pub fn resolve(&self, reference: NodeRef) -> Option<&Node> {
        self.nodes
            .get(reference.type_index as usize)?
            .get(reference.index as usize)
    }
}

fn expect_counts(
    stream: DecodedStream,
    descriptor: &StreamDescriptor,
    label: &str,
) -> Result<Vec<u32>, DeserializationError> {
    match stream {
        DecodedStream::Int(counts) => Ok(counts),
        _ => Err(DeserializationError::UnexpectedStreamKind {
            label: label.to_owned(),
            kind: descriptor.kind,
        }),
    }
}

fn property_values(
    stream: DecodedStream,
    descriptor: &StreamDescriptor,
    label: &str,
) -> Result<Vec<PropertyValue>, DeserializationError> {
    match stream {
        DecodedStream::Bool(values) => Ok(values.into_iter().map(PropertyValue::Bool).collect()),
        DecodedStream::Int(values) => Ok(values.into_iter().map(PropertyValue::Int).collect()),
        DecodedStream::String(values) => {
            Ok(values.into_iter().map(PropertyValue::String).collect())
        }
        DecodedStream::Ref(_) | DecodedStream::Byte(_) => {
            Err(DeserializationError::UnexpectedStreamKind {
                label: label.to_owned(),
                kind: descriptor.kind,
            })
        }
    }
}
