//! XSD dialect loader
//!
//! Extracts `complexType`/`simpleType` definitions, `sequence`/`choice`
//! particles, attributes, restriction facets, and documentation
//! annotations into the shared AST. All format-specific handling stops
//! here; downstream components never see XML again.

use crate::table::TypeTable;
use crate::{Error, Result};
use mx_model::{ElementDeclaration, Facets, Occurs, TypeDefinition, TypeRef};
use roxmltree::Node;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// The XML Schema namespace
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// Result of one XSD parse pass
pub struct ParsedXsd {
    pub root: ElementDeclaration,
    pub table: TypeTable,
    pub message_type: String,
    pub namespace: Option<String>,
}

/// Parse XSD text into the shared AST and a fresh type table
pub fn parse(content: &str) -> Result<ParsedXsd> {
    let doc = roxmltree::Document::parse(content)
        .map_err(|e| Error::Parse(format!("malformed XML: {e}")))?;
    let schema = doc.root_element();
    if !schema.has_tag_name((XSD_NS, "schema")) {
        return Err(Error::Parse(format!(
            "root element is '{}', expected an XML Schema document",
            schema.tag_name().name()
        )));
    }

    let namespace = schema.attribute("targetNamespace").map(str::to_string);
    let message_type = detect_message_type(namespace.as_deref());

    let mut table = TypeTable::new();
    let mut globals: Vec<ElementDeclaration> = Vec::new();

    for child in schema.children().filter(Node::is_element) {
        if child.has_tag_name((XSD_NS, "complexType")) {
            if let Some(name) = child.attribute("name") {
                let definition = parse_complex_type(child, Some(name.to_string()))?;
                table.register(name, definition);
            }
        } else if child.has_tag_name((XSD_NS, "simpleType")) {
            if let Some(name) = child.attribute("name") {
                let definition = parse_simple_type(child, Some(name.to_string()));
                table.register(name, definition);
            }
        } else if child.has_tag_name((XSD_NS, "element")) {
            if let Some(element) = parse_element(child)? {
                globals.push(element);
            }
        } else {
            trace!(
                construct = child.tag_name().name(),
                "Skipping top-level schema construct"
            );
        }
    }

    // ISO 20022 schemas declare the message root as "Document"; fall back
    // to the first global element for other vocabularies.
    let root = match globals.iter().position(|e| e.name == "Document") {
        Some(index) => globals.remove(index),
        None if !globals.is_empty() => globals.remove(0),
        None => {
            return Err(Error::Parse(
                "schema declares no global elements".to_string(),
            ));
        }
    };

    debug!(
        message_type = %message_type,
        type_count = table.len(),
        root = %root.name,
        "Parsed XSD schema"
    );

    Ok(ParsedXsd {
        root,
        table,
        message_type,
        namespace,
    })
}

/// Extract the ISO 20022 message identifier from a target namespace
///
/// `urn:iso:std:iso:20022:tech:xsd:pain.001.001.09` => `pain.001.001.09`
fn detect_message_type(target_namespace: Option<&str>) -> String {
    let Some(ns) = target_namespace else {
        return "unknown".to_string();
    };
    regex::Regex::new(r":xsd:([a-z]{4}\.\d{3}\.\d{3}\.\d{2})")
        .ok()
        .and_then(|pattern| pattern.captures(ns).map(|c| c[1].to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn parse_complex_type(node: Node<'_, '_>, name: Option<String>) -> Result<TypeDefinition> {
    let mut children = Vec::new();
    collect_particles(node, &mut children)?;

    for attribute in node
        .children()
        .filter(|n| n.has_tag_name((XSD_NS, "attribute")))
    {
        if let Some(declaration) = parse_attribute(attribute) {
            children.push(declaration);
        }
    }

    Ok(TypeDefinition::complex(name, children))
}

/// Walk `sequence`/`choice` compositors in document order, flattening
/// nested compositors. Every choice branch is kept: the catalog
/// enumerates all possible structural positions.
fn collect_particles(node: Node<'_, '_>, out: &mut Vec<ElementDeclaration>) -> Result<()> {
    for child in node.children().filter(Node::is_element) {
        if child.has_tag_name((XSD_NS, "sequence")) || child.has_tag_name((XSD_NS, "choice")) {
            collect_particles(child, out)?;
        } else if child.has_tag_name((XSD_NS, "element")) {
            if let Some(element) = parse_element(child)? {
                out.push(element);
            }
        } else if child.has_tag_name((XSD_NS, "annotation"))
            || child.has_tag_name((XSD_NS, "attribute"))
        {
            // annotations are read by the owner; attributes by the caller
        } else {
            trace!(
                construct = child.tag_name().name(),
                "Skipping unsupported particle"
            );
        }
    }
    Ok(())
}

fn parse_element(node: Node<'_, '_>) -> Result<Option<ElementDeclaration>> {
    let Some(name) = node.attribute("name") else {
        trace!("Skipping element declaration without a name");
        return Ok(None);
    };

    let min_occurs = match node.attribute("minOccurs") {
        Some(value) => value.parse::<u32>().map_err(|_| {
            Error::Parse(format!("invalid minOccurs '{value}' on element {name}"))
        })?,
        None => 1,
    };
    let max_occurs = match node.attribute("maxOccurs") {
        Some("unbounded") => Occurs::Unbounded,
        Some(value) => Occurs::Bounded(value.parse::<u32>().map_err(|_| {
            Error::Parse(format!("invalid maxOccurs '{value}' on element {name}"))
        })?),
        None => Occurs::Bounded(1),
    };

    let mut type_ref = node.attribute("type").map(|t| classify_type_ref(node, t));
    if type_ref.is_none() {
        for child in node.children().filter(Node::is_element) {
            if child.has_tag_name((XSD_NS, "complexType")) {
                type_ref = Some(TypeRef::Inline(Rc::new(parse_complex_type(child, None)?)));
                break;
            }
            if child.has_tag_name((XSD_NS, "simpleType")) {
                type_ref = Some(TypeRef::Inline(Rc::new(parse_simple_type(child, None))));
                break;
            }
        }
    }

    let mut element = ElementDeclaration::new(name)
        .with_occurs(min_occurs, max_occurs)
        .with_documentation(documentation(node));
    if let Some(type_ref) = type_ref {
        element = element.with_type(type_ref);
    }
    Ok(Some(element))
}

/// Attributes become child elements: `use="required"` maps to `1..1`,
/// anything else to `0..1`.
fn parse_attribute(node: Node<'_, '_>) -> Option<ElementDeclaration> {
    let name = node.attribute("name")?;
    let (min, max) = if node.attribute("use") == Some("required") {
        (1, Occurs::Bounded(1))
    } else {
        (0, Occurs::Bounded(1))
    };

    let mut declaration = ElementDeclaration::new(name)
        .with_occurs(min, max)
        .with_documentation(documentation(node));
    if let Some(type_name) = node.attribute("type") {
        declaration = declaration.with_type(classify_type_ref(node, type_name));
    }
    Some(declaration)
}

/// Classify a `type="..."` attribute: prefixes bound to the XSD namespace
/// are builtins, everything else is a name to resolve via the type table.
fn classify_type_ref(node: Node<'_, '_>, value: &str) -> TypeRef {
    match value.split_once(':') {
        Some((prefix, local)) => {
            if node.lookup_namespace_uri(Some(prefix)) == Some(XSD_NS) {
                TypeRef::Builtin(local.to_string())
            } else {
                TypeRef::Named(local.to_string())
            }
        }
        None => TypeRef::Named(value.to_string()),
    }
}

fn parse_simple_type(node: Node<'_, '_>, name: Option<String>) -> TypeDefinition {
    let mut definition = TypeDefinition::simple(name);

    let Some(restriction) = node
        .children()
        .find(|n| n.has_tag_name((XSD_NS, "restriction")))
    else {
        return definition;
    };

    if let Some(base) = restriction.attribute("base") {
        let local = base.rsplit(':').next().unwrap_or(base);
        definition = definition.with_base(local);
    }

    let mut facets = Facets::default();
    let mut enumeration = Vec::new();
    for facet in restriction.children().filter(Node::is_element) {
        let value = facet.attribute("value").unwrap_or("");
        if facet.has_tag_name((XSD_NS, "pattern")) {
            // Kept verbatim; compilability is checked per-field during
            // constraint extraction and downgraded to a warning there.
            facets.pattern = Some(value.to_string());
        } else if facet.has_tag_name((XSD_NS, "minLength")) {
            facets.min_length = numeric_facet(value, "minLength", &definition);
        } else if facet.has_tag_name((XSD_NS, "maxLength")) {
            facets.max_length = numeric_facet(value, "maxLength", &definition);
        } else if facet.has_tag_name((XSD_NS, "totalDigits")) {
            facets.total_digits = numeric_facet(value, "totalDigits", &definition);
        } else if facet.has_tag_name((XSD_NS, "fractionDigits")) {
            facets.fraction_digits = numeric_facet(value, "fractionDigits", &definition);
        } else if facet.has_tag_name((XSD_NS, "enumeration")) {
            if let Some(token) = facet.attribute("value") {
                enumeration.push(token.to_string());
            }
        }
    }

    definition.with_facets(facets).with_enumeration(enumeration)
}

fn numeric_facet(value: &str, facet: &str, owner: &TypeDefinition) -> Option<u32> {
    match value.parse::<u32>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(
                facet,
                value,
                owner = owner.display_name(),
                "Ignoring non-numeric facet value"
            );
            None
        }
    }
}

/// `annotation/documentation` text of a declaration, trimmed
fn documentation(node: Node<'_, '_>) -> String {
    node.children()
        .find(|n| n.has_tag_name((XSD_NS, "annotation")))
        .and_then(|annotation| {
            annotation
                .children()
                .find(|n| n.has_tag_name((XSD_NS, "documentation")))
        })
        .and_then(|documentation| documentation.text())
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}
