//! Format detection and the schema loading entry point

use crate::table::TypeTable;
use crate::{avro, xsd, Error, Result};
use mx_model::ElementDeclaration;
use std::path::Path;
use tracing::{info, trace};

/// Source dialect of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Xsd,
    Avro,
}

impl SchemaFormat {
    /// Detect the format from a file extension
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for anything other than
    /// `.xsd`, `.avsc`, or `.avro`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "xsd" => Ok(SchemaFormat::Xsd),
            "avsc" | "avro" => Ok(SchemaFormat::Avro),
            other => Err(Error::UnsupportedFormat(format!(
                "'{other}' (supported: .xsd, .avsc, .avro)"
            ))),
        }
    }

    /// Path separator used in catalogs of this origin: the convention
    /// readers of each ecosystem expect, not structurally significant
    pub fn separator(self) -> char {
        match self {
            SchemaFormat::Xsd => '/',
            SchemaFormat::Avro => '.',
        }
    }
}

/// A fully loaded schema: the declared root, the type table, and
/// identifying metadata
pub struct LoadedSchema {
    pub format: SchemaFormat,

    /// Identified message type (`pain.001.001.09`, Avro record name),
    /// or `"unknown"`
    pub message_type: String,

    /// Target/record namespace, when the source declares one
    pub namespace: Option<String>,

    pub root: ElementDeclaration,
    pub table: TypeTable,
}

/// Loads schema content into the shared AST
///
/// Each call produces an independent `LoadedSchema`; no state is shared
/// between loads.
#[derive(Debug, Default)]
pub struct SchemaLoader;

impl SchemaLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load schema text in the given format
    pub fn load_str(&self, content: &str, format: SchemaFormat) -> Result<LoadedSchema> {
        let loaded = match format {
            SchemaFormat::Xsd => {
                let parsed = xsd::parse(content)?;
                LoadedSchema {
                    format,
                    message_type: parsed.message_type,
                    namespace: parsed.namespace,
                    root: parsed.root,
                    table: parsed.table,
                }
            }
            SchemaFormat::Avro => {
                let parsed = avro::parse(content)?;
                LoadedSchema {
                    format,
                    message_type: parsed.message_type,
                    namespace: parsed.namespace,
                    root: parsed.root,
                    table: parsed.table,
                }
            }
        };
        info!(
            message_type = %loaded.message_type,
            type_count = loaded.table.len(),
            "Schema loaded"
        );
        Ok(loaded)
    }

    /// Load a schema file, inferring the format from its extension
    pub fn load_path(&self, path: &Path) -> Result<LoadedSchema> {
        let format = SchemaFormat::from_path(path)?;
        trace!(?path, ?format, "Loading schema file");
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content, format)
    }
}
