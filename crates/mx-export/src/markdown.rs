//! Markdown export

use crate::summary::constraint_summary;
use crate::{ExportMetadata, Result};
use mx_model::{Catalog, FieldDescriptor};
use std::io::Write;
use tracing::debug;

const DEFINITION_DISPLAY_LIMIT: usize = 100;

/// Writes the catalog as a Markdown document: a metadata section, then
/// separate tables for mandatory and optional fields
pub struct MarkdownExporter;

impl MarkdownExporter {
    pub fn new() -> Self {
        Self
    }

    /// Write the full export to `writer`
    pub fn export<W: Write>(
        &self,
        mut writer: W,
        catalog: &Catalog,
        metadata: &ExportMetadata,
    ) -> Result<()> {
        writeln!(writer, "# {} Field Catalog", metadata.message_type)?;
        writeln!(writer)?;
        writeln!(writer, "## Metadata")?;
        writeln!(writer)?;
        writeln!(writer, "- **Message Type:** {}", metadata.message_type)?;
        writeln!(writer, "- **Total Fields:** {}", metadata.total_fields)?;
        writeln!(writer, "- **Mandatory Fields:** {}", metadata.mandatory_count)?;
        writeln!(writer, "- **Optional Fields:** {}", metadata.optional_count)?;
        writeln!(writer, "- **Extraction Date:** {}", metadata.extraction_date)?;
        writeln!(writer)?;

        self.table(&mut writer, "Mandatory Fields", &catalog.mandatory())?;
        writeln!(writer)?;
        self.table(&mut writer, "Optional Fields", &catalog.optional())?;

        debug!(
            message_type = %metadata.message_type,
            field_count = catalog.len(),
            "Finished writing Markdown export"
        );
        Ok(())
    }

    fn table<W: Write>(
        &self,
        writer: &mut W,
        heading: &str,
        fields: &[&FieldDescriptor],
    ) -> Result<()> {
        writeln!(writer, "## {heading}")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "| Field Name | Path | Multiplicity | Constraints | Definition |"
        )?;
        writeln!(
            writer,
            "|------------|------|--------------|-------------|------------|"
        )?;
        for field in fields {
            writeln!(
                writer,
                "| {} | `{}` | {} | {} | {} |",
                field.name,
                field.path,
                field.multiplicity,
                constraint_summary(field),
                cell_text(&field.definition),
            )?;
        }
        Ok(())
    }
}

impl Default for MarkdownExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Make a definition safe inside a table cell and cap its display length
fn cell_text(definition: &str) -> String {
    let mut text: String = definition
        .replace('|', "\\|")
        .replace('\n', " ")
        .chars()
        .take(DEFINITION_DISPLAY_LIMIT)
        .collect();
    if definition.chars().count() > DEFINITION_DISPLAY_LIMIT {
        text.push_str("...");
    }
    if text.is_empty() {
        text.push('-');
    }
    text
}
