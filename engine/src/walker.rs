//! Object graph walker.
//!
//! Visits every object reachable from a root exactly once, in depth-first
//! order of first encounter, and hands out sequential graph ids. The root
//! always gets id 0. Revisiting an object (shared reference or cycle) never
//! walks its fields again.

use crate::{
    error::Result, wire::NULL_REF, Error, FieldKind, GraphId, ObjectGraph, ObjectId,
    SchemaRegistry, Value,
};
use std::collections::HashMap;

/// Lazy, one-shot depth-first walk over an object graph.
///
/// Yields `(graph_id, object)` pairs. Only included reference fields are
/// followed; objects reachable solely through excluded fields are never
/// visited. The first error ends the walk.
pub struct GraphWalker<'a> {
    graph: &'a ObjectGraph,
    registry: &'a SchemaRegistry,
    ids: HashMap<ObjectId, GraphId>,
    stack: Vec<ObjectId>,
    failed: bool,
}

impl<'a> GraphWalker<'a> {
    /// Start a walk at `root`.
    pub fn new(graph: &'a ObjectGraph, registry: &'a SchemaRegistry, root: ObjectId) -> Self {
        Self {
            graph,
            registry,
            ids: HashMap::new(),
            stack: vec![root],
            failed: false,
        }
    }

    /// Graph id already assigned to an object, if it has been visited.
    pub fn graph_id(&self, object: ObjectId) -> Option<GraphId> {
        self.ids.get(&object).copied()
    }

    /// Number of objects visited so far.
    pub fn visited(&self) -> usize {
        self.ids.len()
    }

    fn visit(&mut self, object: ObjectId) -> Result<GraphId> {
        let instance = self.graph.resolve(object)?;
        let descriptor = self
            .registry
            .get(&instance.type_id)
            .ok_or_else(|| Error::UnregisteredType(instance.type_id.clone()))?;

        let graph_id = GraphId::try_from(self.ids.len())
            .ok()
            .filter(|id| *id != NULL_REF)
            .ok_or(Error::GraphTooLarge(self.ids.len() + 1))?;
        self.ids.insert(object, graph_id);

        let mut children = Vec::new();
        for field in descriptor.included_fields() {
            // Kind mismatches are left for the encoder to report
            match (field.kind, instance.get(&field.name)) {
                (FieldKind::ObjectRef, Some(Value::ObjectRef(Some(target)))) => {
                    children.push(*target)
                }
                (FieldKind::ObjectRefList, Some(Value::ObjectRefList(targets))) => {
                    children.extend(targets.iter().copied())
                }
                _ => {}
            }
        }

        // Reverse so the first declared reference is popped first
        for child in children.into_iter().rev() {
            if !self.ids.contains_key(&child) {
                self.stack.push(child);
            }
        }

        Ok(graph_id)
    }
}

impl Iterator for GraphWalker<'_> {
    type Item = Result<(GraphId, ObjectId)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while let Some(object) = self.stack.pop() {
            if self.ids.contains_key(&object) {
                continue;
            }
            return match self.visit(object) {
                Ok(graph_id) => Some(Ok((graph_id, object))),
                Err(e) => {
                    self.failed = true;
                    self.stack.clear();
                    Some(Err(e))
                }
            };
        }

        None
    }
}

/// Complete graph id assignment for one encode pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAssignment {
    order: Vec<ObjectId>,
    ids: HashMap<ObjectId, GraphId>,
}

impl IdAssignment {
    /// Run a full walk from `root`, assigning every reachable object an id.
    pub fn assign(graph: &ObjectGraph, registry: &SchemaRegistry, root: ObjectId) -> Result<Self> {
        let mut order = Vec::new();
        let mut ids = HashMap::new();

        for step in GraphWalker::new(graph, registry, root) {
            let (graph_id, object) = step?;
            order.push(object);
            ids.insert(object, graph_id);
        }

        Ok(Self { order, ids })
    }

    /// Graph id of an object, `None` if it was not reached.
    pub fn graph_id(&self, object: ObjectId) -> Option<GraphId> {
        self.ids.get(&object).copied()
    }

    /// Objects in graph-id order; the root is first.
    pub fn objects(&self) -> &[ObjectId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
