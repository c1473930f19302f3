//! Configuration management
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (racksdb-schema.toml)
//! - Environment variables (RACKSDB_SCHEMA__*)
//!
//! ## Example config file (racksdb-schema.toml):
//! ```toml
//! [schema]
//! path = "/usr/share/racksdb/schema.yml"
//!
//! [types]
//! dimension = '\d+(\.\d+)?(mm|cm|m)'
//! ipv4_address = '\d{1,3}(\.\d{1,3}){3}'
//!
//! [dump]
//! show_types = true
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::defined_type::TypeDirectory;
use crate::error::Result;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Schema document settings
    #[serde(default)]
    pub schema: DocumentConfig,

    /// Defined type patterns
    #[serde(default)]
    pub types: TypesConfig,

    /// Dump output settings
    #[serde(default)]
    pub dump: DumpConfig,
}

/// Schema document configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Default path of the schema document
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Defined types, by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypesConfig {
    /// Map of defined type name to the regular expression its values match
    #[serde(flatten)]
    pub patterns: BTreeMap<String, String>,
}

/// Dump configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Print the defined types section
    #[serde(default = "default_true")]
    pub show_types: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self { show_types: true }
    }
}

impl SchemaConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "racksdb-schema.toml",
            ".racksdb-schema.toml",
            "config/racksdb-schema.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("org", "rackslab", "racksdb-schema") {
            let xdg_config = config_dir.config_dir().join("racksdb-schema.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("RACKSDB_SCHEMA")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Build the defined type directory from the configured patterns
    pub fn type_directory(&self) -> Result<TypeDirectory> {
        TypeDirectory::from_patterns(
            self.types
                .patterns
                .iter()
                .map(|(name, pattern)| (name.as_str(), pattern.as_str())),
        )
    }

    /// Get the schema document path (resolves relative paths)
    pub fn schema_path(&self) -> Option<PathBuf> {
        self.schema.path.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                std::env::current_dir().unwrap_or_default().join(p)
            }
        })
    }
}
