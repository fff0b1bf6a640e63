#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # mx-model
//!
//! Shared data model for the MX schema catalog engine.
//!
//! This crate defines the normalized schema AST (`TypeDefinition`,
//! `ElementDeclaration`) that both the XSD and Avro loaders populate, and
//! the flat field catalog (`FieldDescriptor`, `Catalog`) that every
//! downstream consumer reads. Once a catalog is built it carries no
//! references back into the AST, so the AST can be dropped.

/// Catalog container and summary statistics.
pub mod catalog;
/// Field descriptors, multiplicity, and constraint sets.
pub mod field;
/// Schema AST: type definitions and element declarations.
pub mod types;

pub use catalog::{Catalog, CatalogStats};
pub use field::{ConstraintSet, FieldDescriptor, Multiplicity, Occurs, Requirement};
pub use types::{ElementDeclaration, Facets, TypeDefinition, TypeKind, TypeRef};
