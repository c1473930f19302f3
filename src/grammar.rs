//! Type specification grammar
//!
//! Parses the strings used as property values in schema documents:
//!
//! ```text
//! spec := ["optional "] type
//! type := "str" | "int" | "float" | "expandable" | "rangeid"
//!       | "list[" type "]"
//!       | ":" ident
//!       | "~" ident
//!       | "$" ident "." ident
//! ```
//!
//! Parsing is purely syntactic. Object and defined type names are resolved
//! afterwards by the [`crate::registry::ObjectRegistry`].

use regex::Regex;

use crate::error::{Result, SchemaError};
use crate::value_type::NativeKind;

/// Prefix marking a property as optional
pub const OPTIONAL_PREFIX: &str = "optional ";

/// Syntactic form of a type specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec<'a> {
    Native(NativeKind),
    Expandable,
    RangeId,
    List(Box<TypeSpec<'a>>),
    Object(&'a str),
    Defined(&'a str),
    Reference { object: &'a str, attribute: &'a str },
}

/// A type specification with its optional marker stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec<'a> {
    pub required: bool,
    pub type_spec: TypeSpec<'a>,
}

/// Compiled type specification patterns
pub struct TypeGrammar {
    list: Regex,
    object: Regex,
    defined: Regex,
    reference: Regex,
}

impl Default for TypeGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeGrammar {
    pub fn new() -> Self {
        Self {
            list: Regex::new(r"^list\[(.+)\]$").unwrap(),
            object: Regex::new(r"^:(\w+)$").unwrap(),
            defined: Regex::new(r"^~(\w+)$").unwrap(),
            reference: Regex::new(r"^\$(\w+)\.(\w+)$").unwrap(),
        }
    }

    /// Parse a property specification, honoring the optional marker
    pub fn parse_property<'a>(&self, spec: &'a str) -> Result<PropertySpec<'a>> {
        let (required, spec) = match spec.strip_prefix(OPTIONAL_PREFIX) {
            Some(rest) => (false, rest),
            None => (true, spec),
        };
        Ok(PropertySpec {
            required,
            type_spec: self.parse_type(spec)?,
        })
    }

    /// Parse a bare type specification. Forms are tried in priority order:
    /// keywords, list, object, defined type, reference.
    pub fn parse_type<'a>(&self, spec: &'a str) -> Result<TypeSpec<'a>> {
        match spec {
            "str" => return Ok(TypeSpec::Native(NativeKind::String)),
            "int" => return Ok(TypeSpec::Native(NativeKind::Integer)),
            "float" => return Ok(TypeSpec::Native(NativeKind::Float)),
            "expandable" => return Ok(TypeSpec::Expandable),
            "rangeid" => return Ok(TypeSpec::RangeId),
            _ => {}
        }

        if let Some(caps) = self.list.captures(spec) {
            if let Some(inner) = caps.get(1) {
                return Ok(TypeSpec::List(Box::new(self.parse_type(inner.as_str())?)));
            }
        }
        if let Some(id) = self.object.captures(spec).and_then(|c| c.get(1)) {
            return Ok(TypeSpec::Object(id.as_str()));
        }
        if let Some(name) = self.defined.captures(spec).and_then(|c| c.get(1)) {
            return Ok(TypeSpec::Defined(name.as_str()));
        }
        if let Some(caps) = self.reference.captures(spec) {
            if let (Some(object), Some(attribute)) = (caps.get(1), caps.get(2)) {
                return Ok(TypeSpec::Reference {
                    object: object.as_str(),
                    attribute: attribute.as_str(),
                });
            }
        }

        Err(SchemaError::UnparsableType(spec.to_string()))
    }
}
