//! Type graph nodes
//!
//! A resolved schema is a graph of [`ValueType`] nodes. Objects are shared
//! through [`Arc`] so that every use of one object identifier points to the
//! same [`SchemaObject`] instance.

use std::fmt;
use std::sync::Arc;

use crate::defined_type::DefinedType;

/// Native scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    String,
    Integer,
    Float,
}

impl NativeKind {
    /// Keyword used for this kind in type specifications
    pub fn keyword(&self) -> &'static str {
        match self {
            NativeKind::String => "str",
            NativeKind::Integer => "int",
            NativeKind::Float => "float",
        }
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A node of the type graph
#[derive(Debug, Clone)]
pub enum ValueType {
    /// `str`, `int` or `float`
    Native(NativeKind),
    /// `list[<inner>]`
    List(Box<ValueType>),
    /// `:Id` resolving to an object without expandable property
    Object(Arc<SchemaObject>),
    /// `:Id` resolving to an object with an expandable property. Only legal
    /// as the element type of a list.
    ExpandableObject(Arc<SchemaObject>),
    /// Marks the property driving list expansion of its object
    Expandable,
    /// Identifier expressed as a numeric range
    RangeId,
    /// Type of attribute `attribute` on object `object_id`. The object is
    /// named rather than held, so objects may refer back to their containers.
    Reference {
        object_id: String,
        attribute: String,
    },
    /// `~name` resolved in the type directory
    Defined(Arc<dyn DefinedType>),
}

impl ValueType {
    /// Wrap an object in the variant matching its expandability
    pub fn object(object: Arc<SchemaObject>) -> Self {
        if object.is_expandable() {
            ValueType::ExpandableObject(object)
        } else {
            ValueType::Object(object)
        }
    }

    pub fn list(inner: ValueType) -> Self {
        ValueType::List(Box::new(inner))
    }

    /// The object behind an `Object` or `ExpandableObject` node
    pub fn as_object(&self) -> Option<&Arc<SchemaObject>> {
        match self {
            ValueType::Object(obj) | ValueType::ExpandableObject(obj) => Some(obj),
            _ => None,
        }
    }

    /// Element type of a list node
    pub fn list_element(&self) -> Option<&ValueType> {
        match self {
            ValueType::List(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_expandable_object(&self) -> bool {
        matches!(self, ValueType::ExpandableObject(_))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Native(kind) => write!(f, "{}", kind),
            ValueType::List(inner) => write!(f, "list[{}]", inner),
            ValueType::Object(obj) | ValueType::ExpandableObject(obj) => write!(f, ":{}", obj.name()),
            ValueType::Expandable => f.write_str("expandable"),
            ValueType::RangeId => f.write_str("rangeid"),
            ValueType::Reference { object_id, attribute } => write!(f, "${}.{}", object_id, attribute),
            ValueType::Defined(defined) => write!(f, "~{}", defined.name()),
        }
    }
}

/// A named, typed member of an object
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub required: bool,
    pub value_type: ValueType,
}

impl Property {
    pub fn new(name: impl Into<String>, required: bool, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            required,
            value_type,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qualifier = if self.required { "required" } else { "optional" };
        write!(f, "{} {}", qualifier, self.value_type)
    }
}

/// A resolved object definition
///
/// Properties keep their declaration order.
#[derive(Debug)]
pub struct SchemaObject {
    name: String,
    properties: Vec<Property>,
    expandable: bool,
}

impl SchemaObject {
    /// Build an object. It is expandable when one of its properties has the
    /// [`ValueType::Expandable`] type.
    pub fn new(name: impl Into<String>, properties: Vec<Property>) -> Self {
        let expandable = properties
            .iter()
            .any(|p| matches!(p.value_type, ValueType::Expandable));
        Self {
            name: name.into(),
            properties,
            expandable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn is_expandable(&self) -> bool {
        self.expandable
    }

    /// Find a property by name
    pub fn prop(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The property carrying the expandable marker, if any
    pub fn expandable_prop(&self) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| matches!(p.value_type, ValueType::Expandable))
    }

    /// Write one `name: type` line per property, indented by `indent` spaces
    pub fn dump(&self, w: &mut impl std::io::Write, indent: usize) -> std::io::Result<()> {
        for prop in &self.properties {
            writeln!(w, "{:indent$}{}: {}", "", prop.name, prop.value_type, indent = indent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rack() -> Arc<SchemaObject> {
        Arc::new(SchemaObject::new(
            "Rack",
            vec![
                Property::new("name", true, ValueType::Native(NativeKind::String)),
                Property::new("slots", false, ValueType::Native(NativeKind::Integer)),
            ],
        ))
    }

    #[test]
    fn test_display_forms() {
        let rack = rack();
        assert_eq!(ValueType::Native(NativeKind::Float).to_string(), "float");
        assert_eq!(ValueType::list(ValueType::list(ValueType::RangeId)).to_string(), "list[list[rangeid]]");
        assert_eq!(ValueType::object(Arc::clone(&rack)).to_string(), ":Rack");
        assert_eq!(
            ValueType::Reference { object_id: rack.name().to_string(), attribute: "name".to_string() }.to_string(),
            "$Rack.name"
        );
        assert_eq!(ValueType::Expandable.to_string(), "expandable");
    }

    #[test]
    fn test_property_display() {
        let p = Property::new("id", false, ValueType::Native(NativeKind::Integer));
        assert_eq!(p.to_string(), "optional int");
        let p = Property::new("id", true, ValueType::list(ValueType::Native(NativeKind::String)));
        assert_eq!(p.to_string(), "required list[str]");
    }

    #[test]
    fn test_object_expandability() {
        let plain = rack();
        assert!(!plain.is_expandable());
        assert!(matches!(ValueType::object(plain), ValueType::Object(_)));

        let node = Arc::new(SchemaObject::new(
            "Node",
            vec![
                Property::new("name", true, ValueType::Expandable),
                Property::new("cpus", true, ValueType::Native(NativeKind::Integer)),
            ],
        ));
        assert!(node.is_expandable());
        assert_eq!(node.expandable_prop().map(|p| p.name.as_str()), Some("name"));
        assert!(ValueType::object(node).is_expandable_object());
    }

    #[test]
    fn test_prop_lookup_and_dump() {
        let rack = rack();
        assert!(rack.prop("slots").is_some());
        assert!(rack.prop("missing").is_none());

        let mut out = Vec::new();
        rack.dump(&mut out, 2).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "  name: str\n  slots: int\n");
    }
}
