//! Binary encoder.
//!
//! Encoding runs in two phases. A full walk first assigns a graph id to every
//! reachable object, then records are built in graph-id order. Every reference
//! field can therefore cite an id, even one whose record comes later.

use crate::{
    error::Result, walker::IdAssignment, EncodedStream, Error, FieldDescriptor, FieldValue,
    ObjectGraph, ObjectId, Record, SchemaRegistry, Value,
};

/// Encodes object graphs against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Encoder<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Encode the graph reachable from `root` into wire bytes.
    ///
    /// Output is deterministic: the same graph and registry always give the
    /// same bytes.
    pub fn encode(&self, graph: &ObjectGraph, root: ObjectId) -> Result<Vec<u8>> {
        let stream = self.encode_stream(graph, root)?;
        let bytes = stream.to_bytes();
        tracing::debug!(
            records = stream.len(),
            bytes = bytes.len(),
            "encoded object graph"
        );
        Ok(bytes)
    }

    /// Encode the graph reachable from `root` into records.
    pub fn encode_stream(&self, graph: &ObjectGraph, root: ObjectId) -> Result<EncodedStream> {
        let assignment = IdAssignment::assign(graph, self.registry, root)?;

        let mut records = Vec::with_capacity(assignment.len());
        for &object in assignment.objects() {
            records.push(self.record(graph, object, &assignment)?);
        }

        Ok(EncodedStream::new(records))
    }

    fn record(
        &self,
        graph: &ObjectGraph,
        object: ObjectId,
        assignment: &IdAssignment,
    ) -> Result<Record> {
        let instance = graph.resolve(object)?;
        let descriptor = self
            .registry
            .get(&instance.type_id)
            .ok_or_else(|| Error::UnregisteredType(instance.type_id.clone()))?;
        let graph_id = assignment
            .graph_id(object)
            .ok_or(Error::InvalidHandle(object.index()))?;

        let mut field_values = Vec::with_capacity(descriptor.fields.len());
        for field in descriptor.included_fields() {
            let value = instance.get(&field.name).ok_or_else(|| {
                Error::malformed(&descriptor.type_id, &field.name, "missing value")
            })?;
            field_values.push(field_value(&descriptor.type_id, field, value, assignment)?);
        }

        Ok(Record {
            graph_id,
            type_id: descriptor.type_id.clone(),
            version: descriptor.version,
            field_values,
        })
    }
}

fn field_value(
    type_id: &str,
    field: &FieldDescriptor,
    value: &Value,
    assignment: &IdAssignment,
) -> Result<FieldValue> {
    if value.kind() != field.kind {
        return Err(Error::malformed(
            type_id,
            &field.name,
            format!("expected {}, found {}", field.kind, value.kind()),
        ));
    }

    let cite = |target: ObjectId| {
        assignment
            .graph_id(target)
            .ok_or(Error::InvalidHandle(target.index()))
    };

    let encoded = match value {
        Value::Int64(v) => FieldValue::Int64(*v),
        Value::Float64(v) => FieldValue::Float64(*v),
        Value::Bool(v) => FieldValue::Bool(*v),
        Value::String(v) => FieldValue::String(v.clone()),
        Value::ObjectRef(None) => FieldValue::ObjectRef(None),
        Value::ObjectRef(Some(target)) => FieldValue::ObjectRef(Some(cite(*target)?)),
        Value::ObjectRefList(targets) => FieldValue::ObjectRefList(
            targets
                .iter()
                .map(|t| cite(*t))
                .collect::<Result<Vec<_>>>()?,
        ),
    };
    Ok(encoded)
}
