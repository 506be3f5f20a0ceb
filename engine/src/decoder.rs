//! Binary decoder.
//!
//! Decoding mirrors the encoder's two phases. The stream is parsed and every
//! record gets an empty object allocated for it, then fields are populated and
//! references resolved against the allocated objects. A reference may point at
//! a record that appears later in the stream.

use crate::{
    error::Result, stream::check_version, EncodedStream, Error, FieldValue, GraphId, Object,
    ObjectGraph, ObjectId, SchemaRegistry, TypeDescriptor, Value,
};
use std::collections::HashMap;

/// A reconstructed object graph and its root.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub graph: ObjectGraph,
    pub root: ObjectId,
}

impl Decoded {
    /// The root object (graph id 0 in the stream).
    pub fn root_object(&self) -> Option<&Object> {
        self.graph.get(self.root)
    }

    pub fn into_parts(self) -> (ObjectGraph, ObjectId) {
        (self.graph, self.root)
    }
}

/// Decodes wire bytes against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Decoder<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Decode wire bytes into an object graph.
    ///
    /// Either the whole graph is reconstructed or an error is returned; no
    /// partial result escapes.
    pub fn decode(&self, bytes: &[u8]) -> Result<Decoded> {
        let stream = EncodedStream::parse(bytes, self.registry)?;
        let decoded = self.materialize(&stream)?;
        tracing::debug!(
            records = stream.len(),
            bytes = bytes.len(),
            "decoded object graph"
        );
        Ok(decoded)
    }

    /// Rebuild an object graph from parsed records.
    pub fn materialize(&self, stream: &EncodedStream) -> Result<Decoded> {
        let mut graph = ObjectGraph::with_capacity(stream.len());
        let mut handles: HashMap<GraphId, ObjectId> = HashMap::with_capacity(stream.len());
        let mut descriptors = Vec::with_capacity(stream.len());

        // Phase 1: allocate every object with zero values
        for record in &stream.records {
            let descriptor = self.registry.lookup(&record.type_id)?;
            check_version(descriptor, record.version)?;
            check_layout(descriptor, &record.field_values)?;

            let mut object = Object::new(descriptor.type_id.clone());
            for field in &descriptor.fields {
                object.set(field.name.clone(), field.zero_value());
            }

            let handle = graph.insert(object);
            if handles.insert(record.graph_id, handle).is_some() {
                return Err(Error::DuplicateRecord(record.graph_id));
            }
            descriptors.push((handle, descriptor));
        }

        let root = *handles.get(&0).ok_or(Error::MissingRoot)?;

        // Phase 2: populate included fields and resolve references
        for (record, (handle, descriptor)) in stream.records.iter().zip(descriptors) {
            for (field, value) in descriptor.included_fields().zip(&record.field_values) {
                let resolved = resolve(value, &handles)?;
                graph.set_field(handle, field.name.clone(), resolved)?;
            }
        }

        Ok(Decoded { graph, root })
    }
}

/// Records built by hand may not match the registered layout.
fn check_layout(descriptor: &TypeDescriptor, values: &[FieldValue]) -> Result<()> {
    let expected = descriptor.included_fields().count();
    if values.len() != expected {
        return Err(Error::malformed(
            &descriptor.type_id,
            "*",
            format!("expected {expected} field values, found {}", values.len()),
        ));
    }

    for (field, value) in descriptor.included_fields().zip(values) {
        if value.kind() != field.kind {
            return Err(Error::malformed(
                &descriptor.type_id,
                &field.name,
                format!("expected {}, found {}", field.kind, value.kind()),
            ));
        }
    }

    Ok(())
}

fn resolve(value: &FieldValue, handles: &HashMap<GraphId, ObjectId>) -> Result<Value> {
    let lookup = |graph_id: GraphId| {
        handles
            .get(&graph_id)
            .copied()
            .ok_or(Error::DanglingReference(graph_id))
    };

    let resolved = match value {
        FieldValue::Int64(v) => Value::Int64(*v),
        FieldValue::Float64(v) => Value::Float64(*v),
        FieldValue::Bool(v) => Value::Bool(*v),
        FieldValue::String(v) => Value::String(v.clone()),
        FieldValue::ObjectRef(None) => Value::ObjectRef(None),
        FieldValue::ObjectRef(Some(target)) => Value::ObjectRef(Some(lookup(*target)?)),
        FieldValue::ObjectRefList(targets) => Value::ObjectRefList(
            targets
                .iter()
                .map(|t| lookup(*t))
                .collect::<Result<Vec<_>>>()?,
        ),
    };
    Ok(resolved)
}
