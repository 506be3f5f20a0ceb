//! Schema registry.
//!
//! The registry maps a type id to its field layout and version tag. Field order
//! and presence on the wire are derived purely from these descriptors, so the
//! decoder must see the same (or a version-compatible) registry as the encoder.

use crate::{error::Result, Error, TypeName, TypeVersion, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Semantic kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Int64,
    Float64,
    Bool,
    String,
    /// Single reference to another object, possibly absent
    ObjectRef,
    /// Ordered references to other objects
    ObjectRefList,
}

impl FieldKind {
    /// Whether values of this kind point at other objects.
    pub fn is_reference(&self) -> bool {
        matches!(self, FieldKind::ObjectRef | FieldKind::ObjectRefList)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Int64 => write!(f, "Int64"),
            FieldKind::Float64 => write!(f, "Float64"),
            FieldKind::Bool => write!(f, "Bool"),
            FieldKind::String => write!(f, "String"),
            FieldKind::ObjectRef => write!(f, "ObjectRef"),
            FieldKind::ObjectRefList => write!(f, "ObjectRefList"),
        }
    }
}

fn default_included() -> bool {
    true
}

/// Definition of a field in a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,
    /// Field kind
    pub kind: FieldKind,
    /// Whether the field is written to the wire. Excluded fields are reset
    /// to their zero value on decode.
    #[serde(default = "default_included")]
    pub included: bool,
}

impl FieldDescriptor {
    /// Create a field that is written to the wire.
    pub fn included(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            included: true,
        }
    }

    /// Create a field that never reaches the wire (a transient field).
    pub fn excluded(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            included: false,
        }
    }

    /// The value this field takes when it is not read from a stream.
    pub fn zero_value(&self) -> Value {
        Value::zero(self.kind)
    }
}

/// Layout and version of a registered type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// Type identifier written into every record
    pub type_id: TypeName,
    /// Version tag, compared exactly on decode
    pub version: TypeVersion,
    /// Fields in wire order
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(
        type_id: impl Into<TypeName>,
        version: TypeVersion,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            type_id: type_id.into(),
            version,
            fields,
        }
    }

    /// Get a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that appear on the wire, in declared order.
    pub fn included_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.included)
    }

    /// Check the descriptor is structurally sound.
    pub fn validate(&self) -> Result<()> {
        if self.type_id.is_empty() {
            return Err(Error::InvalidDescriptor {
                type_id: self.type_id.clone(),
                reason: "type id must not be empty".into(),
            });
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(Error::InvalidDescriptor {
                    type_id: self.type_id.clone(),
                    reason: "field name must not be empty".into(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::InvalidDescriptor {
                    type_id: self.type_id.clone(),
                    reason: format!("duplicate field '{}'", field.name),
                });
            }
        }

        Ok(())
    }
}

/// On-disk form of a registry.
#[derive(Serialize, Deserialize)]
struct RegistryDocument {
    types: Vec<TypeDescriptor>,
}

/// Build-once, read-many mapping of type ids to descriptors.
///
/// There is no removal and no replacement. Once encode or decode calls may be
/// in flight the registry is only read, so it can be shared freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    types: BTreeMap<TypeName, TypeDescriptor>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            types: BTreeMap::new(),
        }
    }

    /// Register a type descriptor.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<()> {
        descriptor.validate()?;

        if self.types.contains_key(&descriptor.type_id) {
            return Err(Error::DuplicateType(descriptor.type_id));
        }

        tracing::trace!(
            type_id = %descriptor.type_id,
            version = descriptor.version,
            fields = descriptor.fields.len(),
            "registered type"
        );
        self.types.insert(descriptor.type_id.clone(), descriptor);
        Ok(())
    }

    /// Builder-style method to register a type.
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Result<Self> {
        self.register(descriptor)?;
        Ok(self)
    }

    /// Look up a type descriptor, failing if it is absent.
    pub fn lookup(&self, type_id: &str) -> Result<&TypeDescriptor> {
        self.types
            .get(type_id)
            .ok_or_else(|| Error::UnknownType(type_id.to_string()))
    }

    /// Get a type descriptor by id.
    pub fn get(&self, type_id: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_id)
    }

    /// Check whether a type id is registered.
    pub fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate descriptors in type-id order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    /// Load a registry from a JSON document of the form `{"types": [...]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: RegistryDocument =
            serde_json::from_str(json).map_err(|e| Error::InvalidSchema(e.to_string()))?;

        let mut registry = Self::new();
        for descriptor in document.types {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Serialize to JSON, types ordered by id.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.document()).map_err(|e| Error::InvalidSchema(e.to_string()))
    }

    /// Serialize to pretty JSON, types ordered by id.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.document())
            .map_err(|e| Error::InvalidSchema(e.to_string()))
    }

    fn document(&self) -> RegistryDocument {
        RegistryDocument {
            types: self.types.values().cloned().collect(),
        }
    }
}
