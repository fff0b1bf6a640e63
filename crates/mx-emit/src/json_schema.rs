//! JSON Schema (draft 2020-12) emission

use crate::{Error, Result};
use mx_model::{ElementDeclaration, Occurs, TypeDefinition, TypeKind};
use mx_schema::{TypeResolver, TypeTable};
use serde_json::{Map, Value, json};
use std::rc::Rc;
use tracing::debug;

const DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Mapping from an XSD or Avro primitive name to a JSON Schema type,
/// with an optional `format` hint
fn primitive(name: &str) -> (&'static str, Option<&'static str>) {
    match name {
        "int" | "integer" | "long" | "short" | "byte" | "positiveInteger" | "negativeInteger"
        | "nonNegativeInteger" | "nonPositiveInteger" | "unsignedLong" | "unsignedInt"
        | "unsignedShort" | "unsignedByte" => ("integer", None),
        "decimal" | "float" | "double" => ("number", None),
        "boolean" => ("boolean", None),
        "date" => ("string", Some("date")),
        "dateTime" => ("string", Some("date-time")),
        "time" => ("string", Some("time")),
        "anyURI" => ("string", Some("uri")),
        // string, normalizedString, token, duration, base64Binary,
        // hexBinary, bytes and anything unrecognized all land on string.
        _ => ("string", None),
    }
}

/// Emits a JSON Schema document from a resolved root element
///
/// Properties follow declaration order and `required` lists the children
/// with `minOccurs >= 1`. Nested occurrences of a type already being
/// expanded degrade to a bare `{"type": "object"}` so cyclic graphs
/// stay finite.
pub struct JsonSchemaEmitter<'a> {
    resolver: TypeResolver<'a>,
}

impl<'a> JsonSchemaEmitter<'a> {
    pub fn new(table: &'a TypeTable) -> Self {
        Self {
            resolver: TypeResolver::new(table),
        }
    }

    /// Emit the schema document for `root`
    ///
    /// # Errors
    ///
    /// Fails on unresolved type references or an element with no
    /// derivable type.
    pub fn emit(&mut self, root: &ElementDeclaration) -> Result<Value> {
        let mut chain = Vec::new();
        let body = self.element_schema(root, &mut chain)?;

        let mut document = Map::new();
        document.insert("$schema".to_string(), json!(DRAFT));
        document.insert("title".to_string(), json!(root.name));
        if let Value::Object(fields) = body {
            document.extend(fields);
        }
        debug!(root = %root.name, "Emitted JSON Schema document");
        Ok(Value::Object(document))
    }

    fn element_schema(
        &mut self,
        element: &ElementDeclaration,
        chain: &mut Vec<*const TypeDefinition>,
    ) -> Result<Value> {
        let Some(type_ref) = &element.type_ref else {
            return Err(Error::MissingType {
                element: element.name.clone(),
            });
        };
        let definition = self.resolver.resolve(type_ref)?;
        let inner = self.type_schema(&definition, chain)?;

        // maxOccurs above one wraps the item schema in an array.
        if element.max_occurs != Occurs::Bounded(1) {
            return Ok(json!({"type": "array", "items": inner}));
        }
        Ok(inner)
    }

    fn type_schema(
        &mut self,
        definition: &Rc<TypeDefinition>,
        chain: &mut Vec<*const TypeDefinition>,
    ) -> Result<Value> {
        match definition.kind {
            TypeKind::Simple => Ok(simple_schema(definition)),
            TypeKind::Complex => {
                let identity = Rc::as_ptr(definition);
                if chain.contains(&identity) {
                    return Ok(json!({"type": "object"}));
                }
                chain.push(identity);

                let mut properties = Map::new();
                let mut required = Vec::new();
                for child in &definition.children {
                    properties.insert(child.name.clone(), self.element_schema(child, chain)?);
                    if child.min_occurs >= 1 {
                        required.push(json!(child.name));
                    }
                }
                chain.pop();

                let mut schema = Map::new();
                schema.insert("type".to_string(), json!("object"));
                schema.insert("properties".to_string(), Value::Object(properties));
                if !required.is_empty() {
                    schema.insert("required".to_string(), Value::Array(required));
                }
                Ok(Value::Object(schema))
            }
        }
    }
}

fn simple_schema(definition: &TypeDefinition) -> Value {
    let source_name = definition
        .base
        .as_deref()
        .or(definition.name.as_deref())
        .unwrap_or("string");
    let (json_type, format) = primitive(source_name);

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!(json_type));
    if let Some(format) = format {
        schema.insert("format".to_string(), json!(format));
    }
    if !definition.enumeration.is_empty() {
        schema.insert("enum".to_string(), json!(definition.enumeration));
    }
    if json_type == "string" {
        let facets = &definition.facets;
        if let Some(min) = facets.min_length {
            schema.insert("minLength".to_string(), json!(min));
        }
        if let Some(max) = facets.max_length {
            schema.insert("maxLength".to_string(), json!(max));
        }
        if let Some(pattern) = &facets.pattern {
            schema.insert("pattern".to_string(), json!(pattern));
        }
    }
    Value::Object(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_schema::{SchemaFormat, SchemaLoader};

    const PERSON_XSD: &str = r#"
        <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:element name="Person" type="PersonType"/>
            <xs:complexType name="PersonType">
                <xs:sequence>
                    <xs:element name="name" type="xs:string" minOccurs="1"/>
                    <xs:element name="age" type="xs:int" minOccurs="0"/>
                </xs:sequence>
            </xs:complexType>
        </xs:schema>
    "#;

    fn emit_xsd(content: &str) -> Value {
        let schema = SchemaLoader::new()
            .load_str(content, SchemaFormat::Xsd)
            .unwrap();
        JsonSchemaEmitter::new(&schema.table)
            .emit(&schema.root)
            .unwrap()
    }

    #[test]
    fn test_person_required_and_properties() {
        let schema = emit_xsd(PERSON_XSD);
        assert_eq!(schema["$schema"], DRAFT);
        assert_eq!(schema["title"], "Person");
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["name"]));
        assert_eq!(schema["properties"]["name"]["type"], "string");
        assert_eq!(schema["properties"]["age"]["type"], "integer");
    }

    #[test]
    fn test_repeatable_element_becomes_array() {
        let schema = emit_xsd(
            r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="Batch" type="BatchType"/>
                <xs:complexType name="BatchType">
                    <xs:sequence>
                        <xs:element name="entry" type="xs:string" maxOccurs="unbounded"/>
                    </xs:sequence>
                </xs:complexType>
            </xs:schema>
        "#,
        );
        let entry = &schema["properties"]["entry"];
        assert_eq!(entry["type"], "array");
        assert_eq!(entry["items"]["type"], "string");
    }

    #[test]
    fn test_enumeration_and_length_facets() {
        let schema = emit_xsd(
            r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="Document" type="Root"/>
                <xs:complexType name="Root">
                    <xs:sequence>
                        <xs:element name="Cd" type="CodeType"/>
                    </xs:sequence>
                </xs:complexType>
                <xs:simpleType name="CodeType">
                    <xs:restriction base="xs:string">
                        <xs:maxLength value="4"/>
                        <xs:enumeration value="AUTH"/>
                        <xs:enumeration value="FDET"/>
                    </xs:restriction>
                </xs:simpleType>
            </xs:schema>
        "#,
        );
        let code = &schema["properties"]["Cd"];
        assert_eq!(code["enum"], json!(["AUTH", "FDET"]));
        assert_eq!(code["maxLength"], 4);
    }

    #[test]
    fn test_date_types_carry_format_hints() {
        let schema = emit_xsd(
            r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="Document" type="Root"/>
                <xs:complexType name="Root">
                    <xs:sequence>
                        <xs:element name="Dt" type="xs:date"/>
                        <xs:element name="Ts" type="xs:dateTime"/>
                    </xs:sequence>
                </xs:complexType>
            </xs:schema>
        "#,
        );
        assert_eq!(schema["properties"]["Dt"]["format"], "date");
        assert_eq!(schema["properties"]["Ts"]["format"], "date-time");
    }

    #[test]
    fn test_cycle_degrades_to_plain_object() {
        let loaded = SchemaLoader::new()
            .load_str(
                r#"{
                    "type": "record",
                    "name": "Node",
                    "fields": [
                        {"name": "child", "type": ["null", "Node"], "default": null}
                    ]
                }"#,
                SchemaFormat::Avro,
            )
            .unwrap();
        let schema = JsonSchemaEmitter::new(&loaded.table)
            .emit(&loaded.root)
            .unwrap();
        assert_eq!(schema["properties"]["child"], json!({"type": "object"}));
    }

    #[test]
    fn test_emission_is_byte_identical() {
        let first = serde_json::to_string(&emit_xsd(PERSON_XSD)).unwrap();
        let second = serde_json::to_string(&emit_xsd(PERSON_XSD)).unwrap();
        assert_eq!(first, second);
    }
}
