//! Named-type resolution against the per-load type table
//!
//! Resolution does not rewrite the AST: the table already holds one `Rc`
//! per named type, so resolving a name hands back a clone of that handle
//! and every referencing site sees the same allocation. The extractor's
//! cycle guard relies on this identity.

use crate::table::TypeTable;
use crate::{Error, Result};
use mx_model::{ElementDeclaration, TypeDefinition, TypeRef};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::{trace, warn};

/// Resolves type references to shared definitions
pub struct TypeResolver<'a> {
    table: &'a TypeTable,

    /// Synthesized definitions for dialect builtins, memoized so that
    /// repeated references to e.g. `xs:string` share one definition
    builtins: HashMap<String, Rc<TypeDefinition>>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(table: &'a TypeTable) -> Self {
        Self {
            table,
            builtins: HashMap::new(),
        }
    }

    /// Resolve a reference to its concrete definition
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedType`] when a named reference has no
    /// entry in the type table.
    pub fn resolve(&mut self, type_ref: &TypeRef) -> Result<Rc<TypeDefinition>> {
        match type_ref {
            TypeRef::Inline(definition) => Ok(Rc::clone(definition)),
            TypeRef::Builtin(name) => Ok(self.builtin(name)),
            TypeRef::Named(name) => self
                .table
                .get(name)
                .ok_or_else(|| Error::UnresolvedType(name.clone())),
        }
    }

    fn builtin(&mut self, name: &str) -> Rc<TypeDefinition> {
        if let Some(existing) = self.builtins.get(name) {
            return Rc::clone(existing);
        }
        trace!(name, "Synthesizing builtin type definition");
        let definition = Rc::new(TypeDefinition::simple(Some(name.to_string())));
        self.builtins
            .insert(name.to_string(), Rc::clone(&definition));
        definition
    }

    /// Diagnose genuinely self-referential types reachable from the root
    ///
    /// Walks the resolved type graph once and reports the names of types
    /// that appear in their own expansion chain, so a caller can warn
    /// before extraction runs into the depth bound.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::UnresolvedType`] for dangling references.
    pub fn recursive_types(&mut self, root: &ElementDeclaration) -> Result<Vec<String>> {
        let mut chain = Vec::new();
        let mut done = HashSet::new();
        let mut found = Vec::new();
        if let Some(type_ref) = &root.type_ref {
            let definition = self.resolve(type_ref)?;
            self.walk(&definition, &mut chain, &mut done, &mut found)?;
        }
        if !found.is_empty() {
            warn!(types = ?found, "Schema contains self-referential types");
        }
        Ok(found)
    }

    fn walk(
        &mut self,
        definition: &Rc<TypeDefinition>,
        chain: &mut Vec<*const TypeDefinition>,
        done: &mut HashSet<*const TypeDefinition>,
        found: &mut Vec<String>,
    ) -> Result<()> {
        let identity = Rc::as_ptr(definition);
        if chain.contains(&identity) {
            let name = definition.display_name().to_string();
            if !found.contains(&name) {
                found.push(name);
            }
            return Ok(());
        }
        if done.contains(&identity) {
            return Ok(());
        }

        chain.push(identity);
        for child in &definition.children {
            if let Some(type_ref) = &child.type_ref {
                let resolved = self.resolve(type_ref)?;
                self.walk(&resolved, chain, done, found)?;
            }
        }
        chain.pop();
        done.insert(identity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_model::Occurs;

    fn table_with(types: Vec<(&str, TypeDefinition)>) -> TypeTable {
        let mut table = TypeTable::new();
        for (name, definition) in types {
            table.register(name, definition);
        }
        table
    }

    #[test]
    fn test_resolve_named() {
        let table = table_with(vec![(
            "Max35Text",
            TypeDefinition::simple(Some("Max35Text".to_string())),
        )]);
        let mut resolver = TypeResolver::new(&table);

        let resolved = resolver
            .resolve(&TypeRef::Named("Max35Text".to_string()))
            .unwrap();
        assert_eq!(resolved.display_name(), "Max35Text");
    }

    #[test]
    fn test_resolve_is_memoized_by_identity() {
        let table = table_with(vec![("T", TypeDefinition::simple(Some("T".to_string())))]);
        let mut resolver = TypeResolver::new(&table);

        let first = resolver.resolve(&TypeRef::Named("T".to_string())).unwrap();
        let second = resolver.resolve(&TypeRef::Named("T".to_string())).unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        let b1 = resolver.resolve(&TypeRef::Builtin("string".to_string())).unwrap();
        let b2 = resolver.resolve(&TypeRef::Builtin("string".to_string())).unwrap();
        assert!(Rc::ptr_eq(&b1, &b2));
    }

    #[test]
    fn test_unresolved_reference_fails() {
        let table = TypeTable::new();
        let mut resolver = TypeResolver::new(&table);

        let result = resolver.resolve(&TypeRef::Named("Missing".to_string()));
        assert!(matches!(result, Err(Error::UnresolvedType(name)) if name == "Missing"));
    }

    #[test]
    fn test_recursive_type_detected() {
        // A record holding an optional field of its own type.
        let recursive = TypeDefinition::complex(
            Some("A".to_string()),
            vec![ElementDeclaration::new("again")
                .with_type(TypeRef::Named("A".to_string()))
                .with_occurs(0, Occurs::Bounded(1))],
        );
        let table = table_with(vec![("A", recursive)]);
        let mut resolver = TypeResolver::new(&table);

        let root = ElementDeclaration::new("Document").with_type(TypeRef::Named("A".to_string()));
        let found = resolver.recursive_types(&root).unwrap();
        assert_eq!(found, vec!["A"]);
    }

    #[test]
    fn test_repeated_non_recursive_type_is_not_flagged() {
        // The same leaf type referenced at two unrelated paths is legal.
        let leaf = TypeDefinition::simple(Some("Leaf".to_string()));
        let parent = TypeDefinition::complex(
            Some("Parent".to_string()),
            vec![
                ElementDeclaration::new("a").with_type(TypeRef::Named("Leaf".to_string())),
                ElementDeclaration::new("b").with_type(TypeRef::Named("Leaf".to_string())),
            ],
        );
        let table = table_with(vec![("Leaf", leaf), ("Parent", parent)]);
        let mut resolver = TypeResolver::new(&table);

        let root =
            ElementDeclaration::new("Document").with_type(TypeRef::Named("Parent".to_string()));
        assert!(resolver.recursive_types(&root).unwrap().is_empty());
    }
}
