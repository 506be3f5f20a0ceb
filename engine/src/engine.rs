//! Engine - the caller-facing entry point.
//!
//! The Engine owns the schema registry and exposes registration, encoding and
//! decoding. Registration needs `&mut self`; encoding and decoding only read,
//! so a fully set-up Engine can be shared across threads behind an `Arc`.

use crate::{
    error::Result, Decoded, Decoder, EncodedStream, Encoder, ObjectGraph, ObjectId,
    SchemaRegistry, TypeDescriptor,
};

/// Serialization engine bound to one schema registry.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    registry: SchemaRegistry,
}

impl Engine {
    /// Create an engine with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: SchemaRegistry::new(),
        }
    }

    /// Create an engine over an already populated registry.
    pub fn with_registry(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Get the registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Register a type. Fails if the type id is already taken.
    pub fn register_type(&mut self, descriptor: TypeDescriptor) -> Result<()> {
        self.registry.register(descriptor)
    }

    /// Encode the graph reachable from `root`.
    pub fn encode(&self, graph: &ObjectGraph, root: ObjectId) -> Result<Vec<u8>> {
        Encoder::new(&self.registry).encode(graph, root)
    }

    /// Encode the graph reachable from `root` without writing bytes.
    pub fn encode_stream(&self, graph: &ObjectGraph, root: ObjectId) -> Result<EncodedStream> {
        Encoder::new(&self.registry).encode_stream(graph, root)
    }

    /// Decode bytes produced by [`Engine::encode`].
    pub fn decode(&self, bytes: &[u8]) -> Result<Decoded> {
        Decoder::new(&self.registry).decode(bytes)
    }
}
