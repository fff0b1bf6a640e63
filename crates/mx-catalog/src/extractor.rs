//! Pre-order field extraction over the resolved AST

use crate::constraints::extract_constraints;
use crate::{Error, Result};
use mx_model::{Catalog, ElementDeclaration, FieldDescriptor, TypeDefinition, TypeRef};
use mx_schema::{SchemaFormat, TypeResolver, TypeTable};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, trace};

/// Tuning for one extraction pass
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Separator between path segments
    pub separator: char,

    /// Maximum depth of complex-type expansion; recursion past this (or
    /// into a type already on the active chain) truncates
    pub max_depth: usize,
}

impl ExtractOptions {
    /// Defaults for a dialect: its conventional separator, depth 20
    pub fn for_format(format: SchemaFormat) -> Self {
        Self {
            separator: format.separator(),
            max_depth: 20,
        }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            separator: '/',
            max_depth: 20,
        }
    }
}

/// Walks the resolved root element and produces the flat catalog
///
/// Traversal is depth-first in declaration order. Each descriptor carries
/// the multiplicity declared on its own element; optionality of ancestors
/// is never folded in.
pub struct FieldExtractor<'a> {
    resolver: TypeResolver<'a>,
    options: ExtractOptions,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(table: &'a TypeTable) -> Self {
        Self {
            resolver: TypeResolver::new(table),
            options: ExtractOptions::default(),
        }
    }

    /// Override the default options
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Extract the ordered catalog starting at the declared root
    ///
    /// # Errors
    ///
    /// Fatal for unresolved type references and for elements with no
    /// derivable type; cycles and malformed facets degrade to per-field
    /// flags and the extraction completes.
    pub fn extract(&mut self, root: &ElementDeclaration, message_type: &str) -> Result<Catalog> {
        let mut catalog = Catalog::new(message_type);

        for name in self.resolver.recursive_types(root)? {
            catalog
                .warnings
                .push(format!("self-referential type '{name}' will be truncated"));
        }

        let mut chain: Vec<*const TypeDefinition> = Vec::new();
        let mut seen_paths = HashSet::new();
        self.walk(root, "", &mut chain, &mut seen_paths, &mut catalog)?;

        debug!(
            message_type,
            field_count = catalog.len(),
            warning_count = catalog.warnings.len(),
            "Extraction finished"
        );
        Ok(catalog)
    }

    fn walk(
        &mut self,
        element: &ElementDeclaration,
        parent_path: &str,
        chain: &mut Vec<*const TypeDefinition>,
        seen_paths: &mut HashSet<String>,
        catalog: &mut Catalog,
    ) -> Result<()> {
        let path = if parent_path.is_empty() {
            element.name.clone()
        } else {
            format!("{parent_path}{}{}", self.options.separator, element.name)
        };

        // Path uniqueness is the catalog's primary invariant. Colliding
        // declarations (same name in two choice branches of one parent)
        // keep their first occurrence only.
        if !seen_paths.insert(path.clone()) {
            trace!(path, "Skipping duplicate path");
            catalog
                .warnings
                .push(format!("duplicate path skipped: {path}"));
            return Ok(());
        }

        let Some(type_ref) = &element.type_ref else {
            return Err(Error::MissingType {
                element: element.name.clone(),
                path,
            });
        };
        let definition = self.resolver.resolve(type_ref)?;

        let (constraints, mut warnings) = extract_constraints(&definition);
        let multiplicity = element.multiplicity();
        if !multiplicity.is_valid() {
            warnings.push(format!("invalid multiplicity {multiplicity}"));
        }

        let identity = Rc::as_ptr(&definition);
        let truncated = definition.is_complex()
            && (chain.iter().any(|&ancestor| ancestor == identity)
                || chain.len() >= self.options.max_depth);

        catalog.fields.push(FieldDescriptor {
            name: element.name.clone(),
            path: path.clone(),
            data_type: data_type_name(type_ref, &definition),
            multiplicity,
            requirement: multiplicity.requirement(),
            definition: element.documentation.clone(),
            constraints,
            truncated,
            warnings,
        });

        if definition.is_complex() && !truncated {
            chain.push(identity);
            for child in &definition.children {
                self.walk(child, &path, chain, seen_paths, catalog)?;
            }
            chain.pop();
        }
        Ok(())
    }
}

/// Readable type name for a descriptor: the declared name when there is
/// one, the restriction base for anonymous simple types, empty otherwise
fn data_type_name(type_ref: &TypeRef, definition: &TypeDefinition) -> String {
    let declared = type_ref.declared_name();
    if !declared.is_empty() {
        return declared.to_string();
    }
    definition.base.clone().unwrap_or_default()
}
