//! Edge case tests for objstream-engine
//!
//! These tests cover boundary conditions and unusual inputs.

use objstream_engine::{
    Engine, Error, FieldDescriptor, FieldKind, Object, ObjectGraph, ObjectId, SchemaRegistry,
    TypeDescriptor, Value,
};

fn create_test_engine() -> Engine {
    let registry = SchemaRegistry::new()
        .with_type(TypeDescriptor::new(
            "Item",
            1,
            vec![
                FieldDescriptor::included("name", FieldKind::String),
                FieldDescriptor::included("count", FieldKind::Int64),
                FieldDescriptor::included("score", FieldKind::Float64),
                FieldDescriptor::included("flag", FieldKind::Bool),
                FieldDescriptor::included("next", FieldKind::ObjectRef),
            ],
        ))
        .unwrap()
        .with_type(TypeDescriptor::new(
            "Account",
            1,
            vec![
                FieldDescriptor::included("id", FieldKind::String),
                FieldDescriptor::included("balance", FieldKind::Float64),
                FieldDescriptor::excluded("pin", FieldKind::String),
            ],
        ))
        .unwrap()
        .with_type(TypeDescriptor::new(
            "Movie",
            1,
            vec![
                FieldDescriptor::included("title", FieldKind::String),
                FieldDescriptor::included("director", FieldKind::String),
                FieldDescriptor::included("year", FieldKind::Int64),
                FieldDescriptor::included("rating", FieldKind::Float64),
            ],
        ))
        .unwrap()
        .with_type(TypeDescriptor::new(
            "Catalog",
            1,
            vec![FieldDescriptor::included("movies", FieldKind::ObjectRefList)],
        ))
        .unwrap()
        .with_type(TypeDescriptor::new("Marker", 1, vec![]))
        .unwrap();

    Engine::with_registry(registry)
}

fn item(name: &str) -> Object {
    Object::new("Item")
        .with("name", name)
        .with("count", 0i64)
        .with("score", 0.0)
        .with("flag", false)
        .with("next", None::<ObjectId>)
}

fn roundtrip_root(engine: &Engine, object: Object) -> Object {
    let mut graph = ObjectGraph::new();
    let root = graph.insert(object);
    let bytes = engine.encode(&graph, root).unwrap();
    engine.decode(&bytes).unwrap().root_object().unwrap().clone()
}

fn movie(title: &str, director: &str, year: i64, rating: f64) -> Object {
    Object::new("Movie")
        .with("title", title)
        .with("director", director)
        .with("year", year)
        .with("rating", rating)
}

// ============================================================================
// Golden Bytes
// ============================================================================

#[test]
fn account_golden_bytes() {
    let engine = create_test_engine();
    let mut graph = ObjectGraph::new();
    let account = graph.insert(
        Object::new("Account")
            .with("id", "A1")
            .with("balance", 500.0)
            .with("pin", "9876"),
    );

    let bytes = engine.encode(&graph, account).unwrap();

    let mut expected = vec![1, 0, 0, 0]; // record count
    expected.extend_from_slice(&[0, 0, 0, 0]); // graph id
    expected.extend_from_slice(&[7, 0, 0, 0]);
    expected.extend_from_slice(b"Account");
    expected.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0]); // version
    expected.extend_from_slice(&[2, 0, 0, 0]);
    expected.extend_from_slice(b"A1");
    expected.extend_from_slice(&[0, 0, 0, 0, 0, 0x40, 0x7f, 0x40]); // 500.0
    assert_eq!(bytes, expected);
}

// ============================================================================
// String Edge Cases
// ============================================================================

#[test]
fn empty_string_fields() {
    let engine = create_test_engine();
    let result = roundtrip_root(&engine, item(""));
    assert_eq!(result.get("name").and_then(Value::as_str), Some(""));
}

#[test]
fn unicode_strings() {
    let engine = create_test_engine();

    let names = vec![
        "日本語テスト",
        "Привет мир",
        "مرحبا بالعالم",
        "🎉🚀💯",
        "Ω≈ç√∫",
        "Hello\nWorld\tTab",
        "Null\0Test",
    ];

    for name in names {
        let result = roundtrip_root(&engine, item(name));
        assert_eq!(
            result.get("name").and_then(Value::as_str),
            Some(name),
            "Failed for: {}",
            name
        );
    }
}

#[test]
fn very_long_strings() {
    let engine = create_test_engine();

    // 1MB string
    let long_string = "x".repeat(1024 * 1024);
    let result = roundtrip_root(&engine, item(&long_string));
    assert_eq!(
        result.get("name").and_then(Value::as_str).map(str::len),
        Some(1024 * 1024)
    );
}

// ============================================================================
// Numeric Edge Cases
// ============================================================================

#[test]
fn integer_boundaries() {
    let engine = create_test_engine();

    for value in [i64::MIN, i64::MAX, 0, -1, 1] {
        let result = roundtrip_root(&engine, item("n").with("count", value));
        assert_eq!(result.get("count").and_then(Value::as_i64), Some(value));
    }
}

#[test]
fn float_special_values() {
    let engine = create_test_engine();

    for value in [
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NAN,
        -0.0,
        f64::MIN_POSITIVE,
        f64::MAX,
        f64::EPSILON,
    ] {
        let result = roundtrip_root(&engine, item("f").with("score", value));
        let read = result.get("score").and_then(Value::as_f64).unwrap();
        assert_eq!(read.to_bits(), value.to_bits(), "Failed for: {}", value);
    }
}

#[test]
fn bool_values() {
    let engine = create_test_engine();
    for flag in [true, false] {
        let result = roundtrip_root(&engine, item("b").with("flag", flag));
        assert_eq!(result.get("flag").and_then(Value::as_bool), Some(flag));
    }
}

// ============================================================================
// Graph Shape Edge Cases
// ============================================================================

#[test]
fn type_without_fields() {
    let engine = create_test_engine();
    let result = roundtrip_root(&engine, Object::new("Marker"));
    assert_eq!(result.type_id, "Marker");
    assert!(result.fields.is_empty());
}

#[test]
fn self_reference() {
    let engine = create_test_engine();
    let mut graph = ObjectGraph::new();
    let me = graph.insert(item("me"));
    graph.set_field(me, "next", me).unwrap();

    let decoded = engine.decode(&engine.encode(&graph, me).unwrap()).unwrap();
    assert_eq!(decoded.graph.len(), 1);
    assert_eq!(
        decoded.graph.field(decoded.root, "next").and_then(Value::as_object),
        Some(decoded.root)
    );
}

#[test]
fn long_chain() {
    let engine = create_test_engine();
    let mut graph = ObjectGraph::new();
    let mut head = graph.insert(item("tail"));
    for i in 0..50_000 {
        head = graph.insert(item(&format!("link {}", i)).with("next", head));
    }

    let decoded = engine.decode(&engine.encode(&graph, head).unwrap()).unwrap();
    assert_eq!(decoded.graph.len(), 50_001);

    // Walk to the end of the chain
    let mut cursor = decoded.root;
    let mut hops = 0;
    while let Some(next) = decoded.graph.field(cursor, "next").and_then(Value::as_object) {
        cursor = next;
        hops += 1;
    }
    assert_eq!(hops, 50_000);
    assert_eq!(
        decoded.graph.field(cursor, "name").and_then(Value::as_str),
        Some("tail")
    );
}

#[test]
fn ring_of_objects() {
    let engine = create_test_engine();
    let mut graph = ObjectGraph::new();
    let nodes: Vec<_> = (0..10).map(|i| graph.insert(item(&format!("n{}", i)))).collect();
    for (i, node) in nodes.iter().enumerate() {
        graph
            .set_field(*node, "next", nodes[(i + 1) % nodes.len()])
            .unwrap();
    }

    let decoded = engine.decode(&engine.encode(&graph, nodes[0]).unwrap()).unwrap();
    assert_eq!(decoded.graph.len(), 10);

    let mut cursor = decoded.root;
    for _ in 0..10 {
        cursor = decoded.graph.field(cursor, "next").and_then(Value::as_object).unwrap();
    }
    assert_eq!(cursor, decoded.root);
}

#[test]
fn unreachable_objects_not_encoded() {
    let engine = create_test_engine();
    let mut graph = ObjectGraph::new();
    let root = graph.insert(item("root"));
    graph.insert(item("orphan"));

    let decoded = engine.decode(&engine.encode(&graph, root).unwrap()).unwrap();
    assert_eq!(decoded.graph.len(), 1);
}

#[test]
fn movie_catalog_list() {
    let engine = create_test_engine();
    let mut graph = ObjectGraph::new();
    let movies = vec![
        graph.insert(movie("Shrek", "Eddie Murphy", 2013, 7.5)),
        graph.insert(movie("Parasite", "Bong Joon-Ho", 2019, 10.0)),
        graph.insert(movie("Us", "Jordan Peele", 2019, 8.5)),
    ];
    let catalog = graph.insert(Object::new("Catalog").with("movies", movies));

    let decoded = engine.decode(&engine.encode(&graph, catalog).unwrap()).unwrap();
    let loaded = decoded
        .root_object()
        .unwrap()
        .get("movies")
        .and_then(Value::as_object_list)
        .unwrap();

    let titles: Vec<_> = loaded
        .iter()
        .map(|m| decoded.graph.field(*m, "title").and_then(Value::as_str).unwrap())
        .collect();
    assert_eq!(titles, vec!["Shrek", "Parasite", "Us"]);
}

#[test]
fn empty_and_repeated_lists() {
    let engine = create_test_engine();
    let mut graph = ObjectGraph::new();
    let empty = graph.insert(Object::new("Catalog").with("movies", Vec::<ObjectId>::new()));

    let decoded = engine.decode(&engine.encode(&graph, empty).unwrap()).unwrap();
    assert_eq!(
        decoded.root_object().unwrap().get("movies"),
        Some(&Value::ObjectRefList(vec![]))
    );

    let us = graph.insert(movie("Us", "Jordan Peele", 2019, 8.5));
    let repeated = graph.insert(Object::new("Catalog").with("movies", vec![us, us, us]));

    let decoded = engine.decode(&engine.encode(&graph, repeated).unwrap()).unwrap();
    let list = decoded
        .root_object()
        .unwrap()
        .get("movies")
        .and_then(Value::as_object_list)
        .unwrap();
    assert_eq!(list.len(), 3);
    assert!(list.iter().all(|m| *m == list[0]));
    assert_eq!(decoded.graph.len(), 2);
}

// ============================================================================
// Corrupt Stream Edge Cases
// ============================================================================

#[test]
fn truncation_at_every_offset() {
    let engine = create_test_engine();
    let mut graph = ObjectGraph::new();
    let a = graph.insert(movie("Shrek", "Eddie Murphy", 2013, 8.5));
    let b = graph.insert(movie("Us", "Jordan Peele", 2019, 8.5));
    let catalog = graph.insert(Object::new("Catalog").with("movies", vec![a, b]));

    let bytes = engine.encode(&graph, catalog).unwrap();
    for len in 0..bytes.len() {
        let result = engine.decode(&bytes[..len]);
        assert!(
            matches!(result, Err(Error::TruncatedStream { .. })),
            "prefix of {} bytes gave {:?}",
            len,
            result
        );
    }
}

#[test]
fn trailing_garbage_rejected() {
    let engine = create_test_engine();
    let mut graph = ObjectGraph::new();
    let root = graph.insert(item("x"));

    let mut bytes = engine.encode(&graph, root).unwrap();
    bytes.push(0xAB);
    assert_eq!(engine.decode(&bytes), Err(Error::TrailingBytes(1)));
}

#[test]
fn empty_buffer() {
    let engine = create_test_engine();
    assert!(matches!(
        engine.decode(&[]),
        Err(Error::TruncatedStream { offset: 0, needed: 4 })
    ));
}

#[test]
fn unknown_type_in_stream() {
    let engine = create_test_engine();

    let mut bytes = vec![1, 0, 0, 0, 0, 0, 0, 0, 5, 0, 0, 0];
    bytes.extend_from_slice(b"Ghost");
    bytes.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0]);

    assert_eq!(engine.decode(&bytes), Err(Error::UnknownType("Ghost".into())));
}

#[test]
fn dangling_reference_in_stream() {
    let engine = create_test_engine();
    let mut graph = ObjectGraph::new();
    let tail = graph.insert(item("tail"));
    let head = graph.insert(item("head").with("next", tail));

    let mut bytes = engine.encode(&graph, head).unwrap();
    // Rewrite the second record's graph id from 1 to 5
    let stream = engine.encode_stream(&graph, head).unwrap();
    let first_record_len = 4 + 4 + "Item".len() + 8 + (4 + "head".len()) + 8 + 8 + 1 + 4;
    let second_id_offset = 4 + first_record_len;
    assert_eq!(stream.records[1].graph_id, 1);
    bytes[second_id_offset] = 5;

    assert_eq!(engine.decode(&bytes), Err(Error::DanglingReference(1)));
}

#[test]
fn nested_version_mismatch_yields_nothing() {
    let writer = create_test_engine();
    let mut reader_registry = SchemaRegistry::new();
    for descriptor in writer.registry().iter() {
        let mut descriptor = descriptor.clone();
        if descriptor.type_id == "Movie" {
            descriptor.version = 2;
        }
        reader_registry.register(descriptor).unwrap();
    }
    let reader = Engine::with_registry(reader_registry);

    let mut graph = ObjectGraph::new();
    let m = graph.insert(movie("Us", "Jordan Peele", 2019, 8.5));
    let catalog = graph.insert(Object::new("Catalog").with("movies", vec![m]));
    let bytes = writer.encode(&graph, catalog).unwrap();

    assert_eq!(
        reader.decode(&bytes),
        Err(Error::VersionMismatch {
            type_id: "Movie".into(),
            expected: 2,
            found: 1,
        })
    );
}

// ============================================================================
// Registry Edge Cases
// ============================================================================

#[test]
fn json_registry_reads_native_stream() {
    let writer = create_test_engine();
    let json = writer.registry().to_json_pretty().unwrap();
    let reader = Engine::with_registry(SchemaRegistry::from_json(&json).unwrap());

    let mut graph = ObjectGraph::new();
    let account = graph.insert(
        Object::new("Account")
            .with("id", "A9")
            .with("balance", -12.25)
            .with("pin", "0000"),
    );
    let bytes = writer.encode(&graph, account).unwrap();

    let decoded = reader.decode(&bytes).unwrap();
    let result = decoded.root_object().unwrap();
    assert_eq!(result.get("balance").and_then(Value::as_f64), Some(-12.25));
    assert_eq!(result.get("pin").and_then(Value::as_str), Some(""));
}

#[test]
fn empty_registry_rejects_everything() {
    let engine = Engine::new();
    let mut graph = ObjectGraph::new();
    let root = graph.insert(item("x"));

    assert!(matches!(
        engine.encode(&graph, root),
        Err(Error::UnregisteredType(t)) if t == "Item"
    ));
}
