//! Avro schema emission

use crate::{Error, Result};
use mx_model::{ElementDeclaration, Occurs, TypeDefinition, TypeKind};
use mx_schema::{TypeResolver, TypeTable};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::debug;

/// Mapping from an XSD or Avro primitive name to an Avro primitive
fn primitive(name: &str) -> &'static str {
    match name {
        "int" | "short" | "byte" | "unsignedShort" | "unsignedByte" => "int",
        "long" | "integer" | "positiveInteger" | "negativeInteger" | "nonNegativeInteger"
        | "nonPositiveInteger" | "unsignedLong" | "unsignedInt" => "long",
        "float" => "float",
        "decimal" | "double" => "double",
        "boolean" => "boolean",
        "base64Binary" | "hexBinary" | "bytes" => "bytes",
        _ => "string",
    }
}

/// Emits an Avro schema document from a resolved root element
///
/// Complex types become `record`s under the caller-supplied namespace.
/// A named type is defined in full on first use and referenced by bare
/// name afterwards, which is what keeps cyclic graphs finite.
pub struct AvroEmitter<'a> {
    resolver: TypeResolver<'a>,
    namespace: String,
}

impl<'a> AvroEmitter<'a> {
    pub fn new(table: &'a TypeTable, namespace: impl Into<String>) -> Self {
        Self {
            resolver: TypeResolver::new(table),
            namespace: namespace.into(),
        }
    }

    /// Emit the schema document for `root`
    ///
    /// # Errors
    ///
    /// Fails on unresolved type references, an element with no derivable
    /// type, or an anonymous complex type that recurses into itself.
    pub fn emit(&mut self, root: &ElementDeclaration) -> Result<Value> {
        let Some(type_ref) = &root.type_ref else {
            return Err(Error::MissingType {
                element: root.name.clone(),
            });
        };
        let definition = self.resolver.resolve(type_ref)?;

        // The top-level record is named after the root element, not its
        // declared type.
        let mut defined = HashSet::new();
        let mut document = self.record_value(&root.name, &definition, &mut defined)?;
        if let Value::Object(record) = &mut document {
            // Namespace on the top-level record only; nested definitions
            // inherit it.
            record.insert("namespace".to_string(), json!(self.namespace));
        }
        debug!(root = %root.name, namespace = %self.namespace, "Emitted Avro document");
        Ok(document)
    }

    fn record_value(
        &mut self,
        name: &str,
        definition: &Rc<TypeDefinition>,
        defined: &mut HashSet<String>,
    ) -> Result<Value> {
        if !defined.insert(name.to_string()) {
            return Ok(json!(name));
        }

        let mut fields = Vec::with_capacity(definition.children.len());
        for child in &definition.children {
            fields.push(self.field_value(child, defined)?);
        }

        let mut record = Map::new();
        record.insert("type".to_string(), json!("record"));
        record.insert("name".to_string(), json!(name));
        record.insert("fields".to_string(), Value::Array(fields));
        Ok(Value::Object(record))
    }

    fn field_value(
        &mut self,
        element: &ElementDeclaration,
        defined: &mut HashSet<String>,
    ) -> Result<Value> {
        let Some(type_ref) = &element.type_ref else {
            return Err(Error::MissingType {
                element: element.name.clone(),
            });
        };
        let definition = self.resolver.resolve(type_ref)?;

        let mut avro_type = match definition.kind {
            TypeKind::Simple if !definition.enumeration.is_empty() => {
                self.enum_value(element, &definition, defined)
            }
            TypeKind::Simple => {
                let source_name = definition
                    .base
                    .as_deref()
                    .or(definition.name.as_deref())
                    .unwrap_or("string");
                json!(primitive(source_name))
            }
            TypeKind::Complex => {
                let record_name = definition
                    .name
                    .clone()
                    .unwrap_or_else(|| record_name_for(&element.name));
                self.record_value(&record_name, &definition, defined)?
            }
        };

        if element.max_occurs != Occurs::Bounded(1) {
            avro_type = json!({"type": "array", "items": avro_type});
        }

        let mut field = Map::new();
        field.insert("name".to_string(), json!(element.name));
        if element.min_occurs == 0 {
            field.insert("type".to_string(), json!(["null", avro_type]));
            field.insert("default".to_string(), Value::Null);
        } else {
            field.insert("type".to_string(), avro_type);
        }
        if !element.documentation.is_empty() {
            field.insert("doc".to_string(), json!(element.documentation));
        }
        Ok(Value::Object(field))
    }

    fn enum_value(
        &mut self,
        element: &ElementDeclaration,
        definition: &TypeDefinition,
        defined: &mut HashSet<String>,
    ) -> Value {
        let enum_name = definition
            .name
            .clone()
            .unwrap_or_else(|| format!("{}Code", record_name_for(&element.name)));
        if !defined.insert(enum_name.clone()) {
            return json!(enum_name);
        }
        json!({
            "type": "enum",
            "name": enum_name,
            "symbols": definition.enumeration,
        })
    }
}

/// Avro names must start with a letter; element names already satisfy
/// that, so this only upcases the first character
fn record_name_for(element_name: &str) -> String {
    let mut chars = element_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
