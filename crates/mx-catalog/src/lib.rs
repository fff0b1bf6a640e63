//! # mx-catalog
//!
//! Field extraction over a loaded schema: walks the resolved AST in
//! pre-order and produces the flat, ordered [`Catalog`] of field
//! descriptors that every exporter and comparison consumes.
//!
//! ## Example Usage
//!
//! ```rust
//! use mx_schema::{SchemaFormat, SchemaLoader};
//!
//! let avsc = r#"{"type": "record", "name": "Person", "fields": [
//!     {"name": "name", "type": "string"}
//! ]}"#;
//! let schema = SchemaLoader::new().load_str(avsc, SchemaFormat::Avro).unwrap();
//! let catalog = mx_catalog::extract(&schema).unwrap();
//! assert_eq!(catalog.fields[1].path, "Person.name");
//! ```

pub mod compare;
pub mod constraints;
pub mod extractor;

pub use compare::{compare, CatalogDiff, FieldChange};
pub use constraints::extract_constraints;
pub use extractor::{ExtractOptions, FieldExtractor};

use mx_model::Catalog;
use mx_schema::LoadedSchema;
use thiserror::Error;

/// Errors that can occur during field extraction
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] mx_schema::Error),

    #[error("Element '{element}' at {path} has no derivable type")]
    MissingType { element: String, path: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to extract the catalog from a loaded schema with
/// the dialect's default options
///
/// # Errors
///
/// Fails on unresolved type references or an element with no derivable
/// type; cycle truncation and constraint issues are reported on the
/// catalog instead.
pub fn extract(schema: &LoadedSchema) -> Result<Catalog> {
    let mut extractor =
        FieldExtractor::new(&schema.table).with_options(ExtractOptions::for_format(schema.format));
    extractor.extract(&schema.root, &schema.message_type)
}

#[cfg(test)]
mod tests {
    use mx_schema::{SchemaFormat, SchemaLoader};

    #[test]
    fn test_convenience_extract_uses_dialect_separator() {
        let loader = SchemaLoader::new();

        let avsc = r#"{"type": "record", "name": "Person", "fields": [
            {"name": "name", "type": "string"}
        ]}"#;
        let schema = loader.load_str(avsc, SchemaFormat::Avro).unwrap();
        let catalog = super::extract(&schema).unwrap();
        assert!(catalog.by_path("Person.name").is_some());

        let xsd = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="Document" type="Person"/>
                <xs:complexType name="Person">
                    <xs:sequence>
                        <xs:element name="name" type="xs:string"/>
                    </xs:sequence>
                </xs:complexType>
            </xs:schema>
        "#;
        let schema = loader.load_str(xsd, SchemaFormat::Xsd).unwrap();
        let catalog = super::extract(&schema).unwrap();
        assert!(catalog.by_path("Document/name").is_some());
    }
}
