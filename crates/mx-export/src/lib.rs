//! # mx-export
//!
//! Catalog exporters. Each takes the extracted field catalog plus a
//! metadata block and renders one output format: CSV for spreadsheets,
//! JSON for downstream tooling, Markdown for documentation.

#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod csv;
pub mod json;
pub mod markdown;
mod summary;

pub use csv::CsvExporter;
pub use json::JsonExporter;
pub use markdown::MarkdownExporter;
pub use summary::constraint_summary;

use chrono::{SecondsFormat, Utc};
use mx_model::Catalog;
use serde::Serialize;

/// Exporter error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("write failed: {0}")]
    Write(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Exporter result type
pub type Result<T> = std::result::Result<T, Error>;

/// Header block written ahead of the field rows in every format
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub message_type: String,
    pub total_fields: usize,
    pub mandatory_count: usize,
    pub optional_count: usize,
    pub extraction_date: String,
}

impl ExportMetadata {
    /// Snapshot the catalog's headline numbers with the current UTC time
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            message_type: catalog.message_type.clone(),
            total_fields: catalog.len(),
            mandatory_count: catalog.mandatory().len(),
            optional_count: catalog.optional().len(),
            extraction_date: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
