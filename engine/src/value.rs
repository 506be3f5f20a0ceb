//! Runtime object model.
//!
//! Objects live in an [`ObjectGraph`] arena and point at each other through
//! [`ObjectId`] handles. Identity is the handle, never the field values: two
//! objects with equal fields are still two objects.

use crate::{error::Result, Error, FieldKind, TypeName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Handle to an object inside an [`ObjectGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(usize);

impl ObjectId {
    /// Position of the object in its arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Value {
    Int64(i64),
    Float64(f64),
    Bool(bool),
    String(String),
    ObjectRef(Option<ObjectId>),
    ObjectRefList(Vec<ObjectId>),
}

impl Value {
    /// The zero value of a kind: 0, 0.0, false, "", no reference, empty list.
    pub fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Int64 => Value::Int64(0),
            FieldKind::Float64 => Value::Float64(0.0),
            FieldKind::Bool => Value::Bool(false),
            FieldKind::String => Value::String(String::new()),
            FieldKind::ObjectRef => Value::ObjectRef(None),
            FieldKind::ObjectRefList => Value::ObjectRefList(Vec::new()),
        }
    }

    /// Kind of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Int64(_) => FieldKind::Int64,
            Value::Float64(_) => FieldKind::Float64,
            Value::Bool(_) => FieldKind::Bool,
            Value::String(_) => FieldKind::String,
            Value::ObjectRef(_) => FieldKind::ObjectRef,
            Value::ObjectRefList(_) => FieldKind::ObjectRefList,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Target of a single reference. `None` for absent references and non-reference values.
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::ObjectRef(target) => *target,
            _ => None,
        }
    }

    pub fn as_object_list(&self) -> Option<&[ObjectId]> {
        match self {
            Value::ObjectRefList(targets) => Some(targets),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<ObjectId> for Value {
    fn from(v: ObjectId) -> Self {
        Value::ObjectRef(Some(v))
    }
}

impl From<Option<ObjectId>> for Value {
    fn from(v: Option<ObjectId>) -> Self {
        Value::ObjectRef(v)
    }
}

impl From<Vec<ObjectId>> for Value {
    fn from(v: Vec<ObjectId>) -> Self {
        Value::ObjectRefList(v)
    }
}

/// An object instance conforming to a registered type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    /// Registered type of this object
    pub type_id: TypeName,
    /// Field values by name
    pub fields: BTreeMap<String, Value>,
}

impl Object {
    /// Create an object with no field values.
    pub fn new(type_id: impl Into<TypeName>) -> Self {
        Self {
            type_id: type_id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style method to set a field.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Arena owning a set of objects connected by references.
///
/// Cycles are expressed as plain handles, so a graph is always acyclic in
/// ownership terms and can be dropped, cloned, or serialized like any value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectGraph {
    objects: Vec<Object>,
}

impl ObjectGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Create an empty graph with room for `capacity` objects.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: Vec::with_capacity(capacity),
        }
    }

    /// Add an object and return its handle.
    pub fn insert(&mut self, object: Object) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    /// Get an object by handle.
    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    /// Get a mutable object by handle.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id.0)
    }

    /// Get an object, failing for handles from another graph.
    pub fn resolve(&self, id: ObjectId) -> Result<&Object> {
        self.get(id).ok_or(Error::InvalidHandle(id.0))
    }

    /// Set a field on an existing object. Used to close cycles after insertion.
    pub fn set_field(
        &mut self,
        id: ObjectId,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<()> {
        let object = self.get_mut(id).ok_or(Error::InvalidHandle(id.0))?;
        object.set(name, value);
        Ok(())
    }

    /// Field value of an object, if both exist.
    pub fn field(&self, id: ObjectId, name: &str) -> Option<&Value> {
        self.get(id)?.get(name)
    }

    /// Number of objects in the arena.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate objects with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, object)| (ObjectId(i), object))
    }
}
