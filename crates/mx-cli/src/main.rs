//! # mx-cli
//!
//! Command-line interface for the MX schema catalog engine.
//!
//! Loads XSD or Avro message schemas, extracts the flat field catalog,
//! converts between schema dialects, and compares catalog versions.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use mx_export::{CsvExporter, ExportMetadata, JsonExporter, MarkdownExporter};
use mx_schema::{LoadedSchema, SchemaLoader};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "mx")]
#[command(about = "MX schema catalog engine CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Extract the field catalog from a schema file
    Extract {
        /// Schema file (.xsd, .avsc, or .avro)
        schema: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Convert a schema to another schema dialect
    Convert {
        /// Schema file (.xsd, .avsc, or .avro)
        schema: PathBuf,

        /// Target dialect
        #[arg(long, value_enum)]
        to: TargetDialect,

        /// Avro namespace for the emitted record
        #[arg(long, default_value = "com.example")]
        namespace: String,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare the field catalogs of two schema versions
    Compare {
        /// Older schema file
        old: PathBuf,

        /// Newer schema file
        new: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
    Md,
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetDialect {
    JsonSchema,
    Avro,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is reserved for catalog and schema output.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract {
            schema,
            output,
            format,
        } => extract(&schema, output.as_deref(), format),
        Commands::Convert {
            schema,
            to,
            namespace,
            output,
        } => convert(&schema, to, &namespace, output.as_deref()),
        Commands::Compare { old, new } => compare(&old, &new),
    }
}

fn load(path: &Path) -> anyhow::Result<LoadedSchema> {
    SchemaLoader::new()
        .load_path(path)
        .with_context(|| format!("failed to load schema from {}", path.display()))
}

fn extract(schema: &Path, output: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let loaded = load(schema)?;
    let catalog = mx_catalog::extract(&loaded)?;
    for warning in &catalog.warnings {
        tracing::warn!("{warning}");
    }
    info!(
        message_type = %catalog.message_type,
        field_count = catalog.len(),
        "Extracted field catalog"
    );

    let metadata = ExportMetadata::from_catalog(&catalog);
    let mut writer = open_output(output)?;
    match format {
        OutputFormat::Csv => CsvExporter::new().export(&mut writer, &catalog, &metadata)?,
        OutputFormat::Json => JsonExporter::new().export(&mut writer, &catalog, &metadata)?,
        OutputFormat::Md => MarkdownExporter::new().export(&mut writer, &catalog, &metadata)?,
    }
    Ok(())
}

fn convert(
    schema: &Path,
    to: TargetDialect,
    namespace: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let loaded = load(schema)?;
    let document = match to {
        TargetDialect::JsonSchema => {
            mx_emit::JsonSchemaEmitter::new(&loaded.table).emit(&loaded.root)?
        }
        TargetDialect::Avro => {
            mx_emit::AvroEmitter::new(&loaded.table, namespace).emit(&loaded.root)?
        }
    };

    let mut writer = open_output(output)?;
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writeln!(writer)?;
    Ok(())
}

fn compare(old: &Path, new: &Path) -> anyhow::Result<()> {
    let old_catalog = mx_catalog::extract(&load(old)?)?;
    let new_catalog = mx_catalog::extract(&load(new)?)?;
    let diff = mx_catalog::compare(&old_catalog, &new_catalog);

    if diff.is_empty() {
        info!("Catalogs are identical");
    } else {
        info!(
            added = diff.added.len(),
            removed = diff.removed.len(),
            changed = diff.changed.len(),
            "Catalogs differ"
        );
    }
    serde_json::to_writer_pretty(io::stdout().lock(), &diff)?;
    println!();
    Ok(())
}

fn open_output(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
