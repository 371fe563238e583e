//! Integration tests for schema reconstruction and the traversal projection.

mod common;

use flatgraph::{
    DeserializationError, Direction, FlatGraph, GraphError, NodeRef, NodeView, Property,
    PropertyValue,
};
use serde_json::{Value, json};

use common::{ContainerBuilder, minimal_container, write_container};

fn open(bytes: &[u8]) -> (tempfile::TempDir, FlatGraph) {
    let (dir, path) = write_container(bytes);
    (dir, FlatGraph::open(&path).unwrap())
}

/// A container with a single node type and one property entry, for
/// exercising the property walk in isolation.
fn property_container(nnodes: usize, qty: &[u32], values: Value, builder: ContainerBuilder) -> Vec<u8> {
    let mut builder = builder;
    let (pool_lengths, pool_bytes) = builder.pool(&["main.cpp", "util.cpp"]);
    let qty = builder.ints(qty);
    builder.finish(&json!({
        "stringPoolLength": pool_lengths,
        "stringPoolBytes": pool_bytes,
        "nodes": [{"nodeLabel": "FILE", "nnodes": nnodes}],
        "edges": [],
        "properties": [{
            "propertyLabel": "ORDER",
            "nodeLabel": "FILE",
            "qty": qty,
            "property": values
        }]
    }))
}

#[test]
fn test_minimal_round_trip() {
    let (_dir, mut graph) = open(&minimal_container());
    let schema = graph.schema().unwrap();

    assert_eq!(schema.label_index().len(), 1);
    assert_eq!(schema.type_index("FILE").unwrap(), 0);

    let files = schema.nodes("FILE").unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].label(), "FILE");

    // Node 0 owns the single AST edge; node 1 owns nothing.
    assert_eq!(files[0].edges().len(), 1);
    assert_eq!(files[1].edges().len(), 0);

    let edge = &files[0].edges()[0];
    assert_eq!(edge.label(), "AST");
    assert_eq!(edge.direction(), Direction::Outgoing);
    assert_eq!(
        edge.source(),
        NodeRef {
            index: 0,
            type_index: 0
        }
    );
    assert_eq!(
        edge.destination(),
        NodeRef {
            index: 1,
            type_index: 0
        }
    );
    assert!(edge.property().is_none());

    // Handles 0 and 1 resolved through the pool.
    assert_eq!(
        files[0].property("NAME"),
        Some(&Property::Scalar(PropertyValue::String("main.cpp".into())))
    );
    assert_eq!(
        files[1].property("NAME"),
        Some(&Property::Scalar(PropertyValue::String("util.cpp".into())))
    );

    let destination = schema.resolve(edge.destination()).unwrap();
    assert_eq!(
        destination.property("NAME"),
        Some(&Property::Scalar(PropertyValue::String("util.cpp".into())))
    );
}

#[test]
fn test_schema_is_cached() {
    let (_dir, mut graph) = open(&minimal_container());
    let first = graph.schema().unwrap() as *const _;
    let second = graph.schema().unwrap() as *const _;
    assert_eq!(first, second);
}

#[test]
fn test_unknown_owner_label_is_lookup_error() {
    let mut builder = ContainerBuilder::new();
    let (pool_lengths, pool_bytes) = builder.pool(&[]);
    let qty = builder.ints(&[0, 0]);
    let neighbors = builder.refs(&[]);

    let bytes = builder.finish(&json!({
        "stringPoolLength": pool_lengths,
        "stringPoolBytes": pool_bytes,
        "nodes": [{"nodeLabel": "FILE", "nnodes": 1}],
        "edges": [{
            "edgeLabel": "AST",
            "nodeLabel": "METHOD",
            "inout": 1,
            "qty": qty,
            "neighbors": neighbors,
            "property": null
        }],
        "properties": []
    }));

    let (_dir, mut graph) = open(&bytes);
    assert!(matches!(graph.schema().unwrap_err(), GraphError::Lookup(_)));
}

#[test]
fn test_quantity_stream_must_cover_nodes_plus_sentinel() {
    let mut builder = ContainerBuilder::new();
    let values = builder.ints(&[]);
    // Two nodes require three quantity entries; supply two.
    let bytes = property_container(2, &[1, 0], values, builder);

    let (_dir, mut graph) = open(&bytes);
    match graph.schema().unwrap_err() {
        GraphError::Deserialization(DeserializationError::QuantityMismatch {
            label,
            expected,
            found,
        }) => {
            assert_eq!(label, "ORDER");
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
        }
        other => panic!("expected a quantity mismatch, got {other:?}"),
    }
}

#[test]
fn test_sentinel_entry_is_never_consumed() {
    let mut builder = ContainerBuilder::new();
    // Garbage in the sentinel slot must not be read as a per-node count.
    let values = builder.ints(&[10, 20]);
    let bytes = property_container(2, &[1, 1, 999], values, builder);

    let (_dir, mut graph) = open(&bytes);
    let schema = graph.schema().unwrap();
    let files = schema.nodes("FILE").unwrap();
    assert_eq!(
        files[0].property("ORDER"),
        Some(&Property::Scalar(PropertyValue::Int(10)))
    );
    assert_eq!(
        files[1].property("ORDER"),
        Some(&Property::Scalar(PropertyValue::Int(20)))
    );
}

#[test]
fn test_property_promoted_to_list_in_order() {
    let mut builder = ContainerBuilder::new();
    let values = builder.ints(&[10, 20, 30]);
    let bytes = property_container(2, &[3, 0, 0], values, builder);

    let (_dir, mut graph) = open(&bytes);
    let schema = graph.schema().unwrap();
    let files = schema.nodes("FILE").unwrap();
    assert_eq!(
        files[0].property("ORDER"),
        Some(&Property::List(vec![
            PropertyValue::Int(10),
            PropertyValue::Int(20),
            PropertyValue::Int(30)
        ]))
    );
    assert_eq!(files[1].property("ORDER"), None);
}

#[test]
fn test_property_stream_exhaustion_rejected() {
    let mut builder = ContainerBuilder::new();
    let values = builder.ints(&[10]);
    let bytes = property_container(2, &[2, 0, 0], values, builder);

    let (_dir, mut graph) = open(&bytes);
    assert!(matches!(
        graph.schema().unwrap_err(),
        GraphError::Deserialization(DeserializationError::StreamExhausted { .. })
    ));
}

#[test]
fn test_trailing_deleted_handles_are_lenient() {
    let mut builder = ContainerBuilder::new();
    // Handle u32::MAX marks a deleted entry; it is past every consumed
    // count, so the walk never notices it.
    let values = builder.string_handles(&[0, u32::MAX]);
    let bytes = property_container(2, &[1, 0, 0], values, builder);

    let (_dir, mut graph) = open(&bytes);
    let schema = graph.schema().unwrap();
    let files = schema.nodes("FILE").unwrap();
    assert_eq!(
        files[0].property("ORDER"),
        Some(&Property::Scalar(PropertyValue::String("main.cpp".into())))
    );
    assert_eq!(files[1].property("ORDER"), None);
}

#[test]
fn test_incoming_edges_attach_to_owning_node() {
    let mut builder = ContainerBuilder::new();
    let (pool_lengths, pool_bytes) = builder.pool(&[]);
    let qty = builder.ints(&[1, 0, 0]);
    let neighbors = builder.refs(&[(1, 0)]);

    let bytes = builder.finish(&json!({
        "stringPoolLength": pool_lengths,
        "stringPoolBytes": pool_bytes,
        "nodes": [{"nodeLabel": "FILE", "nnodes": 2}],
        "edges": [{
            "edgeLabel": "REF",
            "nodeLabel": "FILE",
            "inout": 0,
            "qty": qty,
            "neighbors": neighbors,
            "property": null
        }],
        "properties": []
    }));

    let (_dir, mut graph) = open(&bytes);
    let schema = graph.schema().unwrap();
    let files = schema.nodes("FILE").unwrap();

    // The adjacency list is keyed by the owning node even for incoming
    // edge types; only the direction flag differs.
    assert_eq!(files[0].edges().len(), 1);
    assert_eq!(files[0].edges()[0].direction(), Direction::Incoming);
}

#[test]
fn test_invalid_direction_flag_rejected() {
    let mut builder = ContainerBuilder::new();
    let (pool_lengths, pool_bytes) = builder.pool(&[]);
    let qty = builder.ints(&[0, 0]);
    let neighbors = builder.refs(&[]);

    let bytes = builder.finish(&json!({
        "stringPoolLength": pool_lengths,
        "stringPoolBytes": pool_bytes,
        "nodes": [{"nodeLabel": "FILE", "nnodes": 1}],
        "edges": [{
            "edgeLabel": "AST",
            "nodeLabel": "FILE",
            "inout": 5,
            "qty": qty,
            "neighbors": neighbors,
            "property": null
        }],
        "properties": []
    }));

    let (_dir, mut graph) = open(&bytes);
    assert!(matches!(
        graph.schema().unwrap_err(),
        GraphError::Deserialization(DeserializationError::InvalidDirection(5))
    ));
}

#[test]
fn test_dangling_neighbor_ref_rejected() {
    let mut builder = ContainerBuilder::new();
    let (pool_lengths, pool_bytes) = builder.pool(&[]);
    let qty = builder.ints(&[1, 0]);
    let neighbors = builder.refs(&[(7, 0)]);

    let bytes = builder.finish(&json!({
        "stringPoolLength": pool_lengths,
        "stringPoolBytes": pool_bytes,
        "nodes": [{"nodeLabel": "FILE", "nnodes": 1}],
        "edges": [{
            "edgeLabel": "AST",
            "nodeLabel": "FILE",
            "inout": 1,
            "qty": qty,
            "neighbors": neighbors,
            "property": null
        }],
        "properties": []
    }));

    let (_dir, mut graph) = open(&bytes);
    assert!(matches!(
        graph.schema().unwrap_err(),
        GraphError::Deserialization(DeserializationError::InvalidNodeRef { .. })
    ));
}

#[test]
fn test_edge_property_aligned_with_neighbors() {
    let mut builder = ContainerBuilder::new();
    let (pool_lengths, pool_bytes) = builder.pool(&[]);
    let qty = builder.ints(&[2, 0, 0]);
    let neighbors = builder.refs(&[(1, 0), (0, 0)]);
    let weights = builder.ints(&[7, 9]);

    let bytes = builder.finish(&json!({
        "stringPoolLength": pool_lengths,
        "stringPoolBytes": pool_bytes,
        "nodes": [{"nodeLabel": "FILE", "nnodes": 2}],
        "edges": [{
            "edgeLabel": "AST",
            "nodeLabel": "FILE",
            "inout": 1,
            "qty": qty,
            "neighbors": neighbors,
            "property": weights
        }],
        "properties": []
    }));

    let (_dir, mut graph) = open(&bytes);
    let schema = graph.schema().unwrap();
    let edges = schema.nodes("FILE").unwrap()[0].edges();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].property(), Some(&PropertyValue::Int(7)));
    assert_eq!(edges[1].property(), Some(&PropertyValue::Int(9)));
}

#[test]
fn test_node_types_enumerate_in_manifest_order() {
    let mut builder = ContainerBuilder::new();
    let (pool_lengths, pool_bytes) = builder.pool(&[]);

    let bytes = builder.finish(&json!({
        "stringPoolLength": pool_lengths,
        "stringPoolBytes": pool_bytes,
        "nodes": [
            {"nodeLabel": "FILE", "nnodes": 1},
            {"nodeLabel": "METHOD", "nnodes": 3},
            {"nodeLabel": "CALL", "nnodes": 0}
        ],
        "edges": [],
        "properties": []
    }));

    let (_dir, mut graph) = open(&bytes);
    let schema = graph.schema().unwrap();
    assert_eq!(schema.type_index("FILE").unwrap(), 0);
    assert_eq!(schema.type_index("METHOD").unwrap(), 1);
    assert_eq!(schema.type_index("CALL").unwrap(), 2);
    assert_eq!(schema.nodes_by_type()[1].len(), 3);
    assert_eq!(schema.nodes_by_type()[2].len(), 0);
    assert!(schema.type_index("LITERAL").is_err());
}

#[test]
fn test_view_children_filter_direction_and_label() {
    let mut builder = ContainerBuilder::new();
    let (pool_lengths, pool_bytes) = builder.pool(&[]);
    let ast_qty = builder.ints(&[1, 0, 0, 0]);
    let ast_neighbors = builder.refs(&[(1, 0)]);
    let ref_qty = builder.ints(&[1, 0, 0, 0]);
    let ref_neighbors = builder.refs(&[(2, 0)]);

    let bytes = builder.finish(&json!({
        "stringPoolLength": pool_lengths,
        "stringPoolBytes": pool_bytes,
        "nodes": [{"nodeLabel": "BLOCK", "nnodes": 3}],
        "edges": [
            {
                "edgeLabel": "AST",
                "nodeLabel": "BLOCK",
                "inout": 1,
                "qty": ast_qty,
                "neighbors": ast_neighbors,
                "property": null
            },
            {
                "edgeLabel": "REF",
                "nodeLabel": "BLOCK",
                "inout": 1,
                "qty": ref_qty,
                "neighbors": ref_neighbors,
                "property": null
            }
        ],
        "properties": []
    }));

    let (_dir, mut graph) = open(&bytes);
    let schema = graph.schema().unwrap();
    let root = &schema.nodes("BLOCK").unwrap()[0];
    assert_eq!(root.edges().len(), 2);

    let view = NodeView::new(schema, root, ["AST"]);
    let children = view.children();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].label(), "BLOCK");
    assert!(children[0].children().is_empty());

    // Memoized: repeated calls return the same cached slice.
    assert_eq!(view.children().as_ptr(), children.as_ptr());

    let both = NodeView::new(schema, root, ["AST", "REF"]);
    assert_eq!(both.children().len(), 2);

    let none = NodeView::new(schema, root, ["CFG"]);
    assert!(none.children().is_empty());
}
