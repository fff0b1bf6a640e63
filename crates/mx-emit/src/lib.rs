//! # mx-emit
//!
//! Deterministic schema emitters over the resolved model: JSON Schema
//! (draft 2020-12) and Avro. Both are pure functions of the type table
//! and a root element; the same input always serializes to the same
//! bytes.

#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod avro;
pub mod json_schema;

pub use avro::AvroEmitter;
pub use json_schema::JsonSchemaEmitter;

/// Emitter error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] mx_schema::Error),

    #[error("element '{element}' has no derivable type")]
    MissingType { element: String },
}

/// Emitter result type
pub type Result<T> = std::result::Result<T, Error>;
