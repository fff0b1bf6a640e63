//! # mx-schema
//!
//! Schema loading and type resolution for the MX schema catalog engine.
//!
//! Two dialect loaders (XSD and Avro) normalize their input into the
//! shared `mx-model` AST and a per-load [`TypeTable`]; past this boundary
//! the dialect distinction disappears. The [`TypeResolver`] turns named
//! type references into shared handles onto the table and can diagnose
//! self-referential record types before extraction begins.

pub mod avro;
pub mod loader;
pub mod resolver;
pub mod table;
pub mod xsd;

pub use loader::{LoadedSchema, SchemaFormat, SchemaLoader};
pub use resolver::TypeResolver;
pub use table::TypeTable;

use thiserror::Error;

/// Errors that can occur when loading or resolving schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unresolved type reference: {0}")]
    UnresolvedType(String),

    #[error("Unsupported construct {construct} in {context}")]
    UnsupportedConstruct { construct: String, context: String },

    #[error("Unsupported schema format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
