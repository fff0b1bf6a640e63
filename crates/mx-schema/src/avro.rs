//! Avro dialect loader
//!
//! Normalizes `.avsc` JSON into the same AST the XSD loader produces:
//! records become complex types, enums become enumerated simple types,
//! union-with-null becomes `minOccurs = 0`, arrays become
//! `maxOccurs = unbounded`, and `logicalType` annotations are carried as
//! an informational facet.

use crate::table::TypeTable;
use crate::{Error, Result};
use mx_model::{ElementDeclaration, Facets, Occurs, TypeDefinition, TypeRef};
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, trace};

/// Result of one Avro parse pass
pub struct ParsedAvro {
    pub root: ElementDeclaration,
    pub table: TypeTable,
    pub message_type: String,
    pub namespace: Option<String>,
}

const PRIMITIVES: [&str; 8] = [
    "null", "boolean", "int", "long", "float", "double", "bytes", "string",
];

fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

fn is_null(value: &Value) -> bool {
    value.as_str() == Some("null")
}

/// Parse Avro schema JSON into the shared AST and a fresh type table
pub fn parse(content: &str) -> Result<ParsedAvro> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| Error::Parse(format!("malformed JSON: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| Error::Parse("Avro schema must be a JSON object".to_string()))?;
    if object.get("type").and_then(Value::as_str) != Some("record") {
        return Err(Error::Parse(
            "Avro root schema must be a record".to_string(),
        ));
    }

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Parse("root record has no name".to_string()))?
        .to_string();
    let namespace = object
        .get("namespace")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut table = TypeTable::new();
    let type_ref = convert_type(&value, &mut table, &name)?;
    let root = ElementDeclaration::new(name.clone())
        .with_type(type_ref)
        .with_documentation(
            object
                .get("doc")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        );

    debug!(
        message_type = %name,
        type_count = table.len(),
        "Parsed Avro schema"
    );

    Ok(ParsedAvro {
        root,
        table,
        message_type: name,
        namespace,
    })
}

fn convert_type(value: &Value, table: &mut TypeTable, context: &str) -> Result<TypeRef> {
    match value {
        Value::String(name) if is_primitive(name) => Ok(TypeRef::Builtin(name.clone())),
        Value::String(name) => Ok(TypeRef::Named(name.clone())),
        Value::Object(object) => {
            let kind = object.get("type").and_then(Value::as_str).ok_or_else(|| {
                Error::Parse(format!("type object without 'type' in {context}"))
            })?;
            match kind {
                "record" => convert_record(object, table, context),
                "enum" => convert_enum(object, table, context),
                "fixed" => convert_fixed(object, table, context),
                // A bare array at type position: the caller handles the
                // occurrence bound, the items carry the type.
                "array" => {
                    let items = object.get("items").ok_or_else(|| {
                        Error::Parse(format!("array without items in {context}"))
                    })?;
                    convert_type(items, table, context)
                }
                primitive if is_primitive(primitive) => {
                    let mut facets = Facets::default();
                    if let Some(logical) = object.get("logicalType").and_then(Value::as_str) {
                        facets.logical_type = Some(logical.to_string());
                    }
                    let definition = TypeDefinition::simple(None)
                        .with_base(primitive)
                        .with_facets(facets);
                    Ok(TypeRef::Inline(Rc::new(definition)))
                }
                other => Err(Error::UnsupportedConstruct {
                    construct: other.to_string(),
                    context: context.to_string(),
                }),
            }
        }
        // Union: the null branch controls optionality at the field level;
        // the first non-null branch carries the type.
        Value::Array(branches) => {
            let effective = branches.iter().find(|b| !is_null(b));
            if branches.len() > 2 {
                trace!(context, "Union has more than two branches; using the first non-null");
            }
            match effective {
                Some(branch) => convert_type(branch, table, context),
                None => Ok(TypeRef::Builtin("null".to_string())),
            }
        }
        other => Err(Error::Parse(format!(
            "unexpected Avro type value {other} in {context}"
        ))),
    }
}

fn convert_record(
    object: &serde_json::Map<String, Value>,
    table: &mut TypeTable,
    context: &str,
) -> Result<TypeRef> {
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Parse(format!("record without name in {context}")))?;

    let mut children = Vec::new();
    if let Some(fields) = object.get("fields").and_then(Value::as_array) {
        for field in fields {
            children.push(convert_field(field, table)?);
        }
    }

    table.register(name, TypeDefinition::complex(Some(name.to_string()), children));
    Ok(TypeRef::Named(name.to_string()))
}

fn convert_enum(
    object: &serde_json::Map<String, Value>,
    table: &mut TypeTable,
    context: &str,
) -> Result<TypeRef> {
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Parse(format!("enum without name in {context}")))?;
    let symbols: Vec<String> = object
        .get("symbols")
        .and_then(Value::as_array)
        .map(|symbols| {
            symbols
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    table.register(
        name,
        TypeDefinition::simple(Some(name.to_string())).with_enumeration(symbols),
    );
    Ok(TypeRef::Named(name.to_string()))
}

fn convert_fixed(
    object: &serde_json::Map<String, Value>,
    table: &mut TypeTable,
    context: &str,
) -> Result<TypeRef> {
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Parse(format!("fixed without name in {context}")))?;

    let mut facets = Facets::default();
    if let Some(size) = object.get("size").and_then(Value::as_u64) {
        facets.max_length = u32::try_from(size).ok();
        facets.min_length = facets.max_length;
    }
    table.register(
        name,
        TypeDefinition::simple(Some(name.to_string()))
            .with_base("bytes")
            .with_facets(facets),
    );
    Ok(TypeRef::Named(name.to_string()))
}

fn convert_field(field: &Value, table: &mut TypeTable) -> Result<ElementDeclaration> {
    let object = field
        .as_object()
        .ok_or_else(|| Error::Parse("record field is not an object".to_string()))?;
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Parse("record field without name".to_string()))?;
    let declared = object
        .get("type")
        .ok_or_else(|| Error::Parse(format!("field {name} has no type")))?;
    let documentation = object.get("doc").and_then(Value::as_str).unwrap_or_default();
    let has_default = object.contains_key("default");

    // Strip a union-with-null wrapper first, then an array wrapper; what
    // remains is the element's type.
    let (effective, nullable) = match declared {
        Value::Array(branches) => (
            branches.iter().find(|b| !is_null(b)).unwrap_or(declared),
            branches.iter().any(is_null),
        ),
        other => (other, false),
    };
    let (effective, is_array) = match effective.as_object() {
        Some(inner) if inner.get("type").and_then(Value::as_str) == Some("array") => {
            let items = inner
                .get("items")
                .ok_or_else(|| Error::Parse(format!("array field {name} has no items")))?;
            (items, true)
        }
        _ => (effective, false),
    };

    let type_ref = convert_type(effective, table, name)?;
    let min_occurs = u32::from(!(nullable || has_default));
    let max_occurs = if is_array {
        Occurs::Unbounded
    } else {
        Occurs::Bounded(1)
    };

    Ok(ElementDeclaration::new(name)
        .with_type(type_ref)
        .with_occurs(min_occurs, max_occurs)
        .with_documentation(documentation))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON: &str = r#"{
        "type": "record",
        "name": "Person",
        "namespace": "com.example",
        "fields": [
            {"name": "name", "type": "string"},
            {"name": "age", "type": ["null", "int"], "default": null}
        ]
    }"#;

    #[test]
    fn test_parse_person_record() {
        let parsed = parse(PERSON).unwrap();
        assert_eq!(parsed.message_type, "Person");
        assert_eq!(parsed.namespace.as_deref(), Some("com.example"));
        assert_eq!(parsed.root.name, "Person");

        let person = parsed.table.get("Person").unwrap();
        assert_eq!(person.children.len(), 2);
        assert_eq!(person.children[0].name, "name");
        assert_eq!(person.children[0].min_occurs, 1);
        assert_eq!(person.children[1].name, "age");
        assert_eq!(person.children[1].min_occurs, 0);
        assert_eq!(person.children[1].max_occurs, Occurs::Bounded(1));
    }

    #[test]
    fn test_default_implies_optional() {
        let schema = r#"{
            "type": "record",
            "name": "R",
            "fields": [{"name": "code", "type": "string", "default": "NONE"}]
        }"#;
        let parsed = parse(schema).unwrap();
        let record = parsed.table.get("R").unwrap();
        assert_eq!(record.children[0].min_occurs, 0);
    }

    #[test]
    fn test_array_field_is_unbounded() {
        let schema = r#"{
            "type": "record",
            "name": "Batch",
            "fields": [
                {"name": "entries", "type": {"type": "array", "items": "string"}}
            ]
        }"#;
        let parsed = parse(schema).unwrap();
        let record = parsed.table.get("Batch").unwrap();
        assert_eq!(record.children[0].max_occurs, Occurs::Unbounded);
        assert_eq!(record.children[0].min_occurs, 1);
        assert_eq!(
            record.children[0].type_ref,
            Some(TypeRef::Builtin("string".to_string()))
        );
    }

    #[test]
    fn test_enum_symbols_in_order() {
        let schema = r#"{
            "type": "record",
            "name": "Tx",
            "fields": [
                {"name": "status", "type": {"type": "enum", "name": "Status",
                                            "symbols": ["AUTH", "FDET"]}}
            ]
        }"#;
        let parsed = parse(schema).unwrap();
        let status = parsed.table.get("Status").unwrap();
        assert_eq!(status.enumeration, vec!["AUTH", "FDET"]);
        assert!(status.is_simple());
    }

    #[test]
    fn test_nested_record_registered() {
        let schema = r#"{
            "type": "record",
            "name": "Outer",
            "fields": [
                {"name": "inner", "type": {"type": "record", "name": "Inner",
                    "fields": [{"name": "leaf", "type": "string"}]}}
            ]
        }"#;
        let parsed = parse(schema).unwrap();
        assert!(parsed.table.contains("Inner"));
        let outer = parsed.table.get("Outer").unwrap();
        assert_eq!(
            outer.children[0].type_ref,
            Some(TypeRef::Named("Inner".to_string()))
        );
    }

    #[test]
    fn test_logical_type_surfaces_as_facet() {
        let schema = r#"{
            "type": "record",
            "name": "R",
            "fields": [
                {"name": "when", "type": {"type": "int", "logicalType": "date"}}
            ]
        }"#;
        let parsed = parse(schema).unwrap();
        let record = parsed.table.get("R").unwrap();
        match record.children[0].type_ref {
            Some(TypeRef::Inline(ref def)) => {
                assert_eq!(def.facets.logical_type.as_deref(), Some("date"));
                assert_eq!(def.base.as_deref(), Some("int"));
            }
            ref other => panic!("expected inline type, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        assert!(matches!(parse("{"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_non_record_root_is_fatal() {
        assert!(matches!(
            parse(r#"{"type": "enum", "name": "E", "symbols": []}"#),
            Err(Error::Parse(_))
        ));
    }
}
