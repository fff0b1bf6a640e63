//! CSV export

use crate::summary::constraint_summary;
use crate::{Error, ExportMetadata, Result};
use mx_model::Catalog;
use std::io::Write;
use tracing::debug;

/// Writes the catalog as CSV: `#`-prefixed metadata comment lines,
/// then a header row and one row per descriptor
pub struct CsvExporter {
    delimiter: u8,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Set delimiter character
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter as u8;
        self
    }

    /// Write the full export to `writer`
    pub fn export<W: Write>(
        &self,
        mut writer: W,
        catalog: &Catalog,
        metadata: &ExportMetadata,
    ) -> Result<()> {
        writeln!(writer, "# Message Type: {}", metadata.message_type)?;
        writeln!(writer, "# Total Fields: {}", metadata.total_fields)?;
        writeln!(writer, "# Mandatory Fields: {}", metadata.mandatory_count)?;
        writeln!(writer, "# Optional Fields: {}", metadata.optional_count)?;
        writeln!(writer, "# Extraction Date: {}", metadata.extraction_date)?;
        writeln!(writer, "#")?;

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);
        csv_writer
            .write_record(["FieldName", "Path", "Multiplicity", "Constraints", "Definition"])
            .map_err(|e| Error::Write(e.to_string()))?;

        for field in catalog {
            let multiplicity = field.multiplicity.to_string();
            let constraints = constraint_summary(field);
            csv_writer
                .write_record([
                    field.name.as_str(),
                    field.path.as_str(),
                    multiplicity.as_str(),
                    constraints.as_str(),
                    field.definition.as_str(),
                ])
                .map_err(|e| Error::Write(e.to_string()))?;
        }

        csv_writer
            .flush()
            .map_err(|e| Error::Write(e.to_string()))?;
        debug!(
            message_type = %metadata.message_type,
            field_count = catalog.len(),
            "Finished writing CSV export"
        );
        Ok(())
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}
