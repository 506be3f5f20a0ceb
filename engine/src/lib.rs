//! # objstream Engine
//!
//! A schema-driven binary serialization engine for object graphs.
//!
//! Callers describe their types up front in a [`SchemaRegistry`], build object
//! graphs in an [`ObjectGraph`] arena, and get back a compact, self-describing
//! byte stream. Shared references and cycles survive a round trip, fields can
//! be excluded from the wire, and every record carries a version tag that is
//! checked on decode.
//!
//! ## Design Principles
//!
//! - **No IO**: The engine turns graphs into bytes and back; files and sockets belong to the caller
//! - **Deterministic**: The same graph and registry always produce the same bytes
//! - **Explicit schema**: No reflection; field layout comes from registered descriptors
//! - **All or nothing**: Decode yields a fully populated graph or an error, never a partial graph
//!
//! ## Core Concepts
//!
//! ### Schema Registry
//!
//! A [`TypeDescriptor`] names a type, its version and its ordered fields. Each
//! [`FieldDescriptor`] has a [`FieldKind`] and an `included` flag; excluded
//! fields are never written and come back as their kind's zero value.
//!
//! ### Object Graphs
//!
//! Objects live in an [`ObjectGraph`] and refer to each other by [`ObjectId`].
//! Identity is the handle, not the field values.
//!
//! ### Encoding
//!
//! The [`GraphWalker`] visits reachable objects depth-first and assigns graph
//! ids (root = 0). The [`Encoder`] pre-assigns every id, then writes one
//! [`Record`] per object. The [`Decoder`] allocates all records first and then
//! resolves references, so forward references and cycles decode cleanly.
//!
//! ## Quick Start
//!
//! ```rust
//! use objstream_engine::{Engine, FieldDescriptor, FieldKind, Object, ObjectGraph, TypeDescriptor, Value};
//!
//! // 1. Register a type
//! let mut engine = Engine::new();
//! engine
//!     .register_type(TypeDescriptor::new(
//!         "Account",
//!         1,
//!         vec![
//!             FieldDescriptor::included("id", FieldKind::String),
//!             FieldDescriptor::included("balance", FieldKind::Float64),
//!             FieldDescriptor::excluded("pin", FieldKind::String),
//!         ],
//!     ))
//!     .unwrap();
//!
//! // 2. Build an object
//! let mut graph = ObjectGraph::new();
//! let account = graph.insert(
//!     Object::new("Account")
//!         .with("id", "A1")
//!         .with("balance", 500.0)
//!         .with("pin", "9876"),
//! );
//!
//! // 3. Round trip
//! let bytes = engine.encode(&graph, account).unwrap();
//! let decoded = engine.decode(&bytes).unwrap();
//! let result = decoded.root_object().unwrap();
//!
//! assert_eq!(result.get("id"), Some(&Value::from("A1")));
//! assert_eq!(result.get("pin"), Some(&Value::from(""))); // excluded
//! ```
//!
//! ## Wire Format
//!
//! See [`wire`] for the byte layout.

pub mod decoder;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod schema;
pub mod stream;
pub mod value;
pub mod walker;
pub mod wire;

// Re-export main types at crate root
pub use decoder::{Decoded, Decoder};
pub use encoder::Encoder;
pub use engine::Engine;
pub use error::Error;
pub use schema::{FieldDescriptor, FieldKind, SchemaRegistry, TypeDescriptor};
pub use stream::{EncodedStream, FieldValue, Record};
pub use value::{Object, ObjectGraph, ObjectId, Value};
pub use walker::{GraphWalker, IdAssignment};
pub use wire::NULL_REF;

/// Type aliases for clarity
pub type TypeName = String;
pub type TypeVersion = u64;
pub type GraphId = u32;
