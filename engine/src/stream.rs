//! Structured form of an encoded stream.
//!
//! [`EncodedStream`] is the record-level view of the wire format: the encoder
//! builds one and writes it out, the decoder parses one and materializes it.

use crate::{
    error::Result,
    wire::{ByteReader, ByteWriter, MIN_RECORD_SIZE, NULL_REF},
    Error, FieldKind, GraphId, SchemaRegistry, TypeDescriptor, TypeName, TypeVersion,
};

/// A field value as it appears on the wire. References are graph ids.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int64(i64),
    Float64(f64),
    Bool(bool),
    String(String),
    ObjectRef(Option<GraphId>),
    ObjectRefList(Vec<GraphId>),
}

impl FieldValue {
    /// Kind of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Int64(_) => FieldKind::Int64,
            FieldValue::Float64(_) => FieldKind::Float64,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::ObjectRef(_) => FieldKind::ObjectRef,
            FieldValue::ObjectRefList(_) => FieldKind::ObjectRefList,
        }
    }

    fn write(&self, w: &mut ByteWriter) {
        match self {
            FieldValue::Int64(v) => w.write_i64(*v),
            FieldValue::Float64(v) => w.write_f64(*v),
            FieldValue::Bool(v) => w.write_bool(*v),
            FieldValue::String(v) => w.write_str(v),
            FieldValue::ObjectRef(target) => w.write_u32(target.unwrap_or(NULL_REF)),
            FieldValue::ObjectRefList(targets) => {
                w.write_u32(wire_len(targets.len()));
                for target in targets {
                    w.write_u32(*target);
                }
            }
        }
    }

    fn read(r: &mut ByteReader<'_>, type_id: &str, field: &str, kind: FieldKind) -> Result<Self> {
        let value = match kind {
            FieldKind::Int64 => FieldValue::Int64(r.read_i64()?),
            FieldKind::Float64 => FieldValue::Float64(r.read_f64()?),
            FieldKind::Bool => match r.read_u8()? {
                0 => FieldValue::Bool(false),
                1 => FieldValue::Bool(true),
                other => {
                    return Err(Error::malformed(
                        type_id,
                        field,
                        format!("invalid bool byte {other}"),
                    ))
                }
            },
            FieldKind::String => {
                let bytes = r.read_str_bytes()?;
                let s = std::str::from_utf8(bytes)
                    .map_err(|e| Error::malformed(type_id, field, e.to_string()))?;
                FieldValue::String(s.to_string())
            }
            FieldKind::ObjectRef => match r.read_u32()? {
                NULL_REF => FieldValue::ObjectRef(None),
                target => FieldValue::ObjectRef(Some(target)),
            },
            FieldKind::ObjectRefList => {
                let count = r.read_u32()? as usize;
                let needed = count.saturating_mul(4);
                if r.remaining() < needed {
                    return Err(Error::TruncatedStream {
                        offset: r.position(),
                        needed,
                    });
                }
                let mut targets = Vec::with_capacity(count);
                for _ in 0..count {
                    match r.read_u32()? {
                        NULL_REF => {
                            return Err(Error::malformed(
                                type_id,
                                field,
                                "absent reference inside list",
                            ))
                        }
                        target => targets.push(target),
                    }
                }
                FieldValue::ObjectRefList(targets)
            }
        };
        Ok(value)
    }

    /// Graph ids cited by this value.
    pub fn references(&self) -> &[GraphId] {
        match self {
            FieldValue::ObjectRef(Some(target)) => std::slice::from_ref(target),
            FieldValue::ObjectRefList(targets) => targets,
            _ => &[],
        }
    }
}

/// One serialized object.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Graph-local identity of the object
    pub graph_id: GraphId,
    /// Registered type of the object
    pub type_id: TypeName,
    /// Version tag the object was written with
    pub version: TypeVersion,
    /// Values of the included fields, in declared order
    pub field_values: Vec<FieldValue>,
}

impl Record {
    fn write(&self, w: &mut ByteWriter) {
        w.write_u32(self.graph_id);
        w.write_str(&self.type_id);
        w.write_u64(self.version);
        for value in &self.field_values {
            value.write(w);
        }
    }

    fn read(r: &mut ByteReader<'_>, registry: &SchemaRegistry) -> Result<Self> {
        let graph_id = r.read_u32()?;
        let type_bytes = r.read_str_bytes()?;
        let type_id = std::str::from_utf8(type_bytes)
            .map_err(|e| Error::malformed(format!("<record {graph_id}>"), "typeId", e.to_string()))?
            .to_string();

        let descriptor = registry.lookup(&type_id)?;
        let version = r.read_u64()?;
        check_version(descriptor, version)?;

        let mut field_values = Vec::with_capacity(descriptor.fields.len());
        for field in descriptor.included_fields() {
            field_values.push(FieldValue::read(r, &type_id, &field.name, field.kind)?);
        }

        Ok(Self {
            graph_id,
            type_id,
            version,
            field_values,
        })
    }

    /// Graph ids cited by this record's fields.
    pub fn references(&self) -> impl Iterator<Item = GraphId> + '_ {
        self.field_values
            .iter()
            .flat_map(|v| v.references().iter().copied())
    }
}

pub(crate) fn check_version(descriptor: &TypeDescriptor, found: TypeVersion) -> Result<()> {
    if found != descriptor.version {
        tracing::warn!(
            type_id = %descriptor.type_id,
            expected = descriptor.version,
            found,
            "version mismatch"
        );
        return Err(Error::VersionMismatch {
            type_id: descriptor.type_id.clone(),
            expected: descriptor.version,
            found,
        });
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn wire_len(len: usize) -> u32 {
    debug_assert!(
        u32::try_from(len).is_ok(),
        "length ({len}) exceeds u32::MAX"
    );
    len as u32
}

/// Ordered sequence of records produced by one encode call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedStream {
    pub records: Vec<Record>,
}

impl EncodedStream {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Write the stream in wire format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(4 + self.records.len() * MIN_RECORD_SIZE);
        w.write_u32(wire_len(self.records.len()));
        for record in &self.records {
            record.write(&mut w);
        }
        w.into_bytes()
    }

    /// Parse a stream in wire format.
    ///
    /// Every record's type must be registered with exactly the version found in
    /// the stream. Bytes left over after the declared records are rejected.
    pub fn parse(bytes: &[u8], registry: &SchemaRegistry) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        let count = r.read_u32()? as usize;

        // Never trust the count for allocation beyond what the buffer can hold
        let mut records = Vec::with_capacity(count.min(r.remaining() / MIN_RECORD_SIZE));
        for _ in 0..count {
            records.push(Record::read(&mut r, registry)?);
        }

        if !r.is_exhausted() {
            return Err(Error::TrailingBytes(r.remaining()));
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
