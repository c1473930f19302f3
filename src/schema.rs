//! Schema Model
//!
//! Root aggregate of a resolved schema: version tag, defined type
//! directory, object registry and root content type.

use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use crate::defined_type::{DefinedType, TypeDirectory};
use crate::error::{Result, SchemaError};
use crate::registry::{ObjectRegistry, Resolver};
use crate::value_type::{SchemaObject, ValueType};

/// Top-level key holding the schema version tag
pub const VERSION_KEY: &str = "_version";
/// Top-level key holding named object definitions
pub const OBJECTS_KEY: &str = "_objects";
/// Top-level key holding the root content definition
pub const CONTENT_KEY: &str = "_content";

/// A fully resolved schema
///
/// Built once from a loaded document; immutable afterwards. Every object
/// reachable from the content is resolved during [`Schema::build`].
#[derive(Debug)]
pub struct Schema {
    version: Value,
    types: TypeDirectory,
    objects: ObjectRegistry,
    content: ValueType,
    root: Arc<SchemaObject>,
}

impl Schema {
    /// Resolve a schema document against a populated type directory
    pub fn build(document: &Value, types: TypeDirectory) -> Result<Self> {
        let top = document
            .as_object()
            .ok_or_else(|| SchemaError::Malformed("top level must be a mapping".to_string()))?;

        let version = top.get(VERSION_KEY).cloned().ok_or(SchemaError::MissingVersion)?;
        let content = top.get(CONTENT_KEY).ok_or(SchemaError::MissingContent)?;

        tracing::debug!(version = %version, defined_types = types.len(), "building schema");

        let (objects, content) = {
            let mut resolver = Resolver::new(top.get(OBJECTS_KEY), &types)?;
            let content = resolver.parse_object(CONTENT_KEY, content)?;
            resolver.resolve_references()?;
            (resolver.finish(), content)
        };
        let root = Arc::new(content);
        let content = ValueType::object(Arc::clone(&root));

        tracing::debug!(objects = objects.len(), "schema resolved");

        Ok(Self {
            version,
            types,
            objects,
            content,
            root,
        })
    }

    /// Opaque version tag, as found in the document
    pub fn version(&self) -> &Value {
        &self.version
    }

    pub fn types(&self) -> &TypeDirectory {
        &self.types
    }

    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    /// Resolved object by identifier
    pub fn object(&self, object_id: &str) -> Option<&Arc<SchemaObject>> {
        self.objects.get(object_id)
    }

    /// Root content type
    pub fn content(&self) -> &ValueType {
        &self.content
    }

    /// Root content object
    pub fn content_object(&self) -> &Arc<SchemaObject> {
        &self.root
    }

    /// Write a human-readable projection of the schema
    pub fn dump(&self, w: &mut impl Write) -> std::io::Result<()> {
        self.dump_with(w, true)
    }

    /// Same as [`Schema::dump`], optionally leaving out defined types
    pub fn dump_with(&self, w: &mut impl Write, show_types: bool) -> std::io::Result<()> {
        if show_types {
            writeln!(w, "_types:")?;
            for (name, defined_type) in self.types.iter() {
                writeln!(w, "  {}: {}", name, defined_type.pattern())?;
            }
        }
        writeln!(w, "_objects:")?;
        for (name, obj) in self.objects.iter() {
            writeln!(w, "  {}:", name)?;
            obj.dump(w, 4)?;
        }
        writeln!(w, "_content:")?;
        self.root.dump(w, 2)
    }

    /// Dump into a string
    pub fn dump_string(&self) -> String {
        let mut out = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.dump(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_version() {
        let doc = json!({"_content": {"name": "str"}});
        assert!(matches!(Schema::build(&doc, TypeDirectory::new()), Err(SchemaError::MissingVersion)));
    }

    #[test]
    fn test_missing_content() {
        let doc = json!({"_version": "0.1"});
        assert!(matches!(Schema::build(&doc, TypeDirectory::new()), Err(SchemaError::MissingContent)));
    }

    #[test]
    fn test_top_level_not_mapping() {
        let doc = json!(["_version"]);
        assert!(matches!(Schema::build(&doc, TypeDirectory::new()), Err(SchemaError::Malformed(_))));
    }

    #[test]
    fn test_version_is_opaque() {
        let doc = json!({"_version": 1.5, "_content": {}});
        let schema = Schema::build(&doc, TypeDirectory::new()).unwrap();
        assert_eq!(schema.version(), &json!(1.5));
        assert!(schema.objects().is_empty());
        assert!(schema.content_object().properties().is_empty());
    }

    #[test]
    fn test_unreferenced_objects_are_not_resolved() {
        let doc = json!({
            "_version": 1,
            "_objects": {"Unused": {"x": "list[:Missing]"}, "Used": {"id": "int"}},
            "_content": {"used": ":Used"},
        });
        let schema = Schema::build(&doc, TypeDirectory::new()).unwrap();
        assert!(schema.object("Used").is_some());
        assert!(schema.object("Unused").is_none());
    }

    #[test]
    fn test_dump() {
        let doc = json!({
            "_version": 1,
            "_objects": {"Rack": {"name": "str", "height": "optional ~dimension"}},
            "_content": {"racks": "list[:Rack]"},
        });
        let types = TypeDirectory::from_patterns([("dimension", r"\d+u")]).unwrap();
        let schema = Schema::build(&doc, types).unwrap();
        let expected = "\
_types:
  dimension: \\d+u
_objects:
  Rack:
    name: str
    height: ~dimension
_content:
  racks: list[:Rack]
";
        assert_eq!(schema.dump_string(), expected);

        let mut out = Vec::new();
        schema.dump_with(&mut out, false).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("_objects:\n"));
    }
}
