//! Defined (custom) types
//!
//! A defined type is a pluggable scalar validator referenced from schema
//! specifications with the `~name` form. The resolver only looks entries up
//! by name in a [`TypeDirectory`] that the embedding application fills
//! beforehand.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{Result, SchemaError};

/// A named validator for raw scalar values
pub trait DefinedType: fmt::Debug + Send + Sync {
    /// Canonical lowercase name, as referenced by `~name`
    fn name(&self) -> &str;

    /// Descriptor of accepted values, printed by the schema dump
    fn pattern(&self) -> &str;

    /// Check whether a raw scalar value is accepted by this type
    fn is_valid(&self, value: &str) -> bool;
}

/// Defined type backed by an anchored regular expression
#[derive(Debug, Clone)]
pub struct PatternType {
    name: String,
    pattern: String,
    regex: Regex,
}

impl PatternType {
    /// Compile a new pattern type. The pattern must match the whole value.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|source| SchemaError::InvalidPattern { name: name.clone(), source })?;
        Ok(Self { name, pattern, regex })
    }
}

impl DefinedType for PatternType {
    fn name(&self) -> &str {
        &self.name
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn is_valid(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// Name to implementation mapping of defined types
///
/// Entries are iterated in name order.
#[derive(Debug, Clone, Default)]
pub struct TypeDirectory {
    types: BTreeMap<String, Arc<dyn DefinedType>>,
}

impl TypeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory of [`PatternType`]s from `(name, pattern)` pairs
    pub fn from_patterns<I, N, P>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<String>,
    {
        let mut directory = Self::new();
        for (name, pattern) in patterns {
            directory.register(PatternType::new(name, pattern)?);
        }
        Ok(directory)
    }

    /// Register a defined type under its own name, replacing any previous
    /// entry with the same name.
    pub fn register(&mut self, defined_type: impl DefinedType + 'static) {
        self.insert(Arc::new(defined_type));
    }

    /// Register an already shared defined type
    pub fn insert(&mut self, defined_type: Arc<dyn DefinedType>) {
        self.types.insert(defined_type.name().to_string(), defined_type);
    }

    /// Look up a defined type by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn DefinedType>> {
        self.types.get(name)
    }

    /// Look up a defined type, failing if it is not registered
    pub fn find(&self, name: &str) -> Result<Arc<dyn DefinedType>> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::DefinedTypeNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn DefinedType>)> {
        self.types.iter().map(|(name, t)| (name.as_str(), t))
    }
}

/// Implementation name conventionally associated with a defined type module
///
/// `ipv4_address` becomes `SchemaDefinedTypeIpv4Address`. Embedders that map
/// plugin modules to implementations can use it to keep names consistent.
pub fn defined_type_class_name(module: &str) -> String {
    let suffix: String = module
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect();
    format!("SchemaDefinedType{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_type_is_anchored() {
        let t = PatternType::new("dimension", r"\d+(mm|cm|m)").unwrap();
        assert!(t.is_valid("42mm"));
        assert!(!t.is_valid("x42mm"));
        assert!(!t.is_valid("42mmx"));
        assert_eq!(t.pattern(), r"\d+(mm|cm|m)");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternType::new("broken", "(").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_directory_lookup() {
        let dir = TypeDirectory::from_patterns([("mac", "[0-9a-f:]+"), ("bytes", r"\d+[KMGT]?B")]).unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.find("mac").unwrap().name(), "mac");
        let names: Vec<_> = dir.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["bytes", "mac"]);

        match dir.find("nope") {
            Err(SchemaError::DefinedTypeNotFound(name)) => assert_eq!(name, "nope"),
            other => panic!("Expected DefinedTypeNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_defined_type_class_name() {
        assert_eq!(defined_type_class_name("my_type"), "SchemaDefinedTypeMyType");
        assert_eq!(defined_type_class_name("ipv4_address"), "SchemaDefinedTypeIpv4Address");
        assert_eq!(defined_type_class_name("dimension"), "SchemaDefinedTypeDimension");
    }
}
