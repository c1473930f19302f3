//! Error types for schema definition resolution

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema definition errors
///
/// Every failure while building a [`crate::Schema`] surfaces as one of these
/// variants. Construction is fail-fast: the first error aborts the build.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Malformed schema document: {0}")]
    Malformed(String),

    #[error("Version must be defined in schema")]
    MissingVersion,

    #[error("Content must be defined in schema")]
    MissingContent,

    #[error("Invalid definition of {object}: {reason}")]
    InvalidDefinition { object: String, reason: String },

    #[error("Unable to parse value type '{0}'")]
    UnparsableType(String),

    #[error("Definition of object {0} not found in schema")]
    ObjectNotFound(String),

    #[error("Definition of defined type {0} not found")]
    DefinedTypeNotFound(String),

    #[error("Expandable object {object_type} must be in a list, it cannot be member of object such as {container}")]
    ExpandableNotInList { object_type: String, container: String },

    #[error("Expandable object {0} cannot contain more than one expandable property")]
    MultipleExpandable(String),

    #[error("Cyclic definition of objects detected: {}", .chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    #[error("Invalid pattern for defined type {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl From<serde_yaml::Error> for SchemaError {
    fn from(err: serde_yaml::Error) -> Self {
        SchemaError::Malformed(err.to_string())
    }
}
