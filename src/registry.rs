//! Object Registry
//!
//! Resolves named object definitions of a schema document into shared
//! [`SchemaObject`] instances. Each identifier is resolved at most once;
//! later lookups return the memoized instance.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::defined_type::{DefinedType, TypeDirectory};
use crate::error::{Result, SchemaError};
use crate::grammar::{TypeGrammar, TypeSpec};
use crate::value_type::{Property, SchemaObject, ValueType};

/// Memo table of resolved objects, in resolution order
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: HashMap<String, Arc<SchemaObject>>,
    order: Vec<String>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a resolved object by identifier
    pub fn get(&self, object_id: &str) -> Option<&Arc<SchemaObject>> {
        self.objects.get(object_id)
    }

    pub fn contains(&self, object_id: &str) -> bool {
        self.objects.contains_key(object_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate over objects in the order their resolution completed
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<SchemaObject>)> {
        self.order
            .iter()
            .filter_map(move |id| self.objects.get(id).map(|obj| (id.as_str(), obj)))
    }

    /// Object named by a [`ValueType::Reference`]
    pub fn reference_target(&self, value_type: &ValueType) -> Option<&Arc<SchemaObject>> {
        match value_type {
            ValueType::Reference { object_id, .. } => self.get(object_id),
            _ => None,
        }
    }

    fn insert(&mut self, object_id: &str, object: Arc<SchemaObject>) {
        if self.objects.insert(object_id.to_string(), object).is_none() {
            self.order.push(object_id.to_string());
        }
    }
}

/// Single resolution pass over a schema document
///
/// Object and value type resolution are mutually recursive: parsing a
/// property may resolve another object before the current one completes.
/// Objects named by attribute references are resolved on the spot, except
/// back-references to an object still being parsed: those are queued and
/// resolved by [`Resolver::resolve_references`], so containment (`:Id`,
/// `list[:Id]`) is the only edge that can form a cycle.
pub(crate) struct Resolver<'a> {
    definitions: Option<&'a Map<String, Value>>,
    types: &'a TypeDirectory,
    grammar: TypeGrammar,
    registry: ObjectRegistry,
    /// Objects whose properties are being parsed, outermost first
    in_progress: Vec<String>,
    /// Back-referenced objects, resolved once the content pass completes
    pending_refs: VecDeque<String>,
}

impl<'a> Resolver<'a> {
    /// `definitions` is the document's `_objects` section, if any
    pub(crate) fn new(definitions: Option<&'a Value>, types: &'a TypeDirectory) -> Result<Self> {
        let definitions = match definitions {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                return Err(SchemaError::InvalidDefinition {
                    object: "_objects".to_string(),
                    reason: "must be a mapping of object definitions".to_string(),
                })
            }
        };
        Ok(Self {
            definitions,
            types,
            grammar: TypeGrammar::new(),
            registry: ObjectRegistry::new(),
            in_progress: Vec::new(),
            pending_refs: VecDeque::new(),
        })
    }

    /// Resolve an object by identifier, memoized
    pub(crate) fn find_object(&mut self, object_id: &str) -> Result<Arc<SchemaObject>> {
        if let Some(obj) = self.registry.get(object_id) {
            tracing::trace!(object = object_id, "object already resolved");
            return Ok(Arc::clone(obj));
        }

        if let Some(pos) = self.in_progress.iter().position(|id| id == object_id) {
            let mut chain = self.in_progress[pos..].to_vec();
            chain.push(object_id.to_string());
            return Err(SchemaError::Cycle { chain });
        }

        let definitions = self.definitions;
        let definition = definitions
            .and_then(|defs| defs.get(object_id))
            .ok_or_else(|| SchemaError::ObjectNotFound(object_id.to_string()))?;

        tracing::debug!(object = object_id, "resolving object definition");
        self.in_progress.push(object_id.to_string());
        let parsed = self.parse_object(object_id, definition);
        self.in_progress.pop();

        let obj = Arc::new(parsed?);
        self.registry.insert(object_id, Arc::clone(&obj));
        Ok(obj)
    }

    /// Parse a property map into an object. The identifier only labels the
    /// object; it is not registered.
    pub(crate) fn parse_object(&mut self, object_id: &str, definition: &Value) -> Result<SchemaObject> {
        let definition = definition.as_object().ok_or_else(|| SchemaError::InvalidDefinition {
            object: object_id.to_string(),
            reason: "must be a mapping of properties".to_string(),
        })?;

        let mut properties = Vec::with_capacity(definition.len());
        let mut expandable = false;

        for (name, spec) in definition {
            let spec = spec.as_str().ok_or_else(|| SchemaError::InvalidDefinition {
                object: object_id.to_string(),
                reason: format!("specification of property {} must be a string", name),
            })?;
            let prop = self.property(name, spec)?;

            match &prop.value_type {
                ValueType::ExpandableObject(obj) => {
                    return Err(SchemaError::ExpandableNotInList {
                        object_type: obj.name().to_string(),
                        container: object_id.to_string(),
                    });
                }
                ValueType::Expandable => {
                    if expandable {
                        return Err(SchemaError::MultipleExpandable(object_id.to_string()));
                    }
                    expandable = true;
                }
                _ => {}
            }
            tracing::trace!(object = object_id, property = %name, value_type = %prop.value_type, "parsed property");
            properties.push(prop);
        }

        Ok(SchemaObject::new(object_id, properties))
    }

    fn property(&mut self, name: &str, spec: &str) -> Result<Property> {
        let parsed = self.grammar.parse_property(spec)?;
        let value_type = self.value_type(parsed.type_spec)?;
        Ok(Property::new(name, parsed.required, value_type))
    }

    fn value_type(&mut self, spec: TypeSpec<'_>) -> Result<ValueType> {
        Ok(match spec {
            TypeSpec::Native(kind) => ValueType::Native(kind),
            TypeSpec::Expandable => ValueType::Expandable,
            TypeSpec::RangeId => ValueType::RangeId,
            TypeSpec::List(inner) => ValueType::list(self.value_type(*inner)?),
            TypeSpec::Object(object_id) => ValueType::object(self.find_object(object_id)?),
            TypeSpec::Defined(name) => ValueType::Defined(self.find_defined_type(name)?),
            TypeSpec::Reference { object, attribute } => {
                self.reference(object)?;
                ValueType::Reference {
                    object_id: object.to_string(),
                    attribute: attribute.to_string(),
                }
            }
        })
    }

    /// Resolve the object named by an attribute reference, queueing it when
    /// the reference points back into the objects being parsed
    fn reference(&mut self, object_id: &str) -> Result<()> {
        if self.in_progress.iter().any(|id| id == object_id) {
            self.pending_refs.push_back(object_id.to_string());
            return Ok(());
        }
        match self.find_object(object_id) {
            Ok(_) => Ok(()),
            // the cycle runs through this reference, not through containment only
            Err(SchemaError::Cycle { chain }) if self.in_progress.contains(&chain[0]) => {
                tracing::debug!(object = object_id, "deferring back-referenced object");
                self.pending_refs.push_back(object_id.to_string());
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Resolve queued back-referenced objects in discovery order, including
    /// references queued along the way
    pub(crate) fn resolve_references(&mut self) -> Result<()> {
        while let Some(object_id) = self.pending_refs.pop_front() {
            if !self.registry.contains(&object_id) {
                tracing::debug!(object = %object_id, "resolving referenced object");
                self.find_object(&object_id)?;
            }
        }
        Ok(())
    }

    fn find_defined_type(&self, name: &str) -> Result<Arc<dyn DefinedType>> {
        tracing::debug!(defined_type = name, "looking up defined type");
        self.types.find(name)
    }

    /// Give up the populated memo table
    pub(crate) fn finish(self) -> ObjectRegistry {
        self.registry
    }
}
