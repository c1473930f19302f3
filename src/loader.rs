//! Schema document loading
//!
//! Reads YAML schema documents into the generic nested structure consumed
//! by [`crate::Schema::build`]. Mapping key order is preserved.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::defined_type::TypeDirectory;
use crate::error::Result;
use crate::schema::Schema;

/// Loads a schema document from a YAML file
#[derive(Debug, Clone)]
pub struct SchemaFileLoader {
    path: PathBuf,
}

impl SchemaFileLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document
    pub fn content(&self) -> Result<Value> {
        tracing::debug!(path = %self.path.display(), "loading schema document");
        let text = fs::read_to_string(&self.path)?;
        parse_document(&text)
    }

    /// Read the document and resolve it against `types`
    pub fn load(&self, types: TypeDirectory) -> Result<Schema> {
        Schema::build(&self.content()?, types)
    }
}

/// Parse YAML text into a schema document
pub fn parse_document(text: &str) -> Result<Value> {
    let document: Value = serde_yaml::from_str(text)?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use tempfile::tempdir;

    #[test]
    fn test_parse_preserves_order() {
        let doc = parse_document("_version: 1\n_content:\n  zeta: str\n  alpha: int\n").unwrap();
        let keys: Vec<_> = doc["_content"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_malformed_yaml() {
        let err = parse_document("_content: [unclosed").unwrap_err();
        assert!(matches!(err, SchemaError::Malformed(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.yml");
        fs::write(&path, "_version: '0.2'\n_content:\n  name: str\n").unwrap();

        let schema = SchemaFileLoader::new(&path).load(TypeDirectory::new()).unwrap();
        assert_eq!(schema.version().as_str(), Some("0.2"));
        assert!(schema.content_object().prop("name").unwrap().required);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let loader = SchemaFileLoader::new(dir.path().join("absent.yml"));
        assert!(matches!(loader.content(), Err(SchemaError::Io(_))));
    }
}
