//! RacksDB Schema Resolver
//!
//! Turns a declarative schema document into an in-memory, cross-referenced
//! type graph that validators and accessors can walk without re-parsing.
//!
//! ## Features
//!
//! - **Type Grammar**: native scalars, lists, object references, attribute
//!   references and pluggable defined types
//! - **Shared Objects**: each object identifier resolves to one instance
//! - **Build-time Checks**: expandable placement and uniqueness, unknown
//!   objects and types, cyclic object definitions
//!
//! ## Document
//!
//! ```text
//! _version: 1
//! _objects:
//!   Node:
//!     name: expandable
//!     rack: $Rack.id
//!     ip: optional ~ipv4_address
//!   Rack:
//!     id: int
//!     nodes: list[:Node]
//! _content:
//!   racks: list[:Rack]
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use racksdb_schema::{SchemaFileLoader, TypeDirectory};
//!
//! let types = TypeDirectory::from_patterns([("ipv4_address", r"\d{1,3}(\.\d{1,3}){3}")])?;
//! let schema = SchemaFileLoader::new("schema.yml").load(types)?;
//! print!("{}", schema.dump_string());
//! # Ok::<(), racksdb_schema::SchemaError>(())
//! ```

pub mod config;
pub mod defined_type;
pub mod error;
pub mod grammar;
pub mod loader;
pub mod registry;
pub mod schema;
pub mod value_type;

pub use config::SchemaConfig;
pub use defined_type::{DefinedType, PatternType, TypeDirectory};
pub use error::{Result, SchemaError};
pub use grammar::{PropertySpec, TypeGrammar, TypeSpec};
pub use loader::{parse_document, SchemaFileLoader};
pub use registry::ObjectRegistry;
pub use schema::Schema;
pub use value_type::{NativeKind, Property, SchemaObject, ValueType};
