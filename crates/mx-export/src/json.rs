//! JSON export

use crate::{ExportMetadata, Result};
use mx_model::Catalog;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

#[derive(Serialize)]
struct JsonDocument<'a> {
    metadata: &'a ExportMetadata,
    fields: &'a [mx_model::FieldDescriptor],
}

/// Writes the catalog as a pretty-printed JSON document with a
/// `metadata` block and a `fields` array of camelCase descriptor objects
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }

    /// Write the full export to `writer`
    pub fn export<W: Write>(
        &self,
        writer: W,
        catalog: &Catalog,
        metadata: &ExportMetadata,
    ) -> Result<()> {
        let document = JsonDocument {
            metadata,
            fields: &catalog.fields,
        };
        serde_json::to_writer_pretty(writer, &document)?;
        debug!(
            message_type = %metadata.message_type,
            field_count = catalog.len(),
            "Finished writing JSON export"
        );
        Ok(())
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}
