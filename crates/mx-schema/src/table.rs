//! Per-load registry of named type definitions

use mx_model::TypeDefinition;
use std::collections::HashMap;
use std::rc::Rc;

/// Mapping from type name to its definition, built once per schema load
///
/// Every named type is stored behind an `Rc`, so all references to the
/// same name resolve to the same allocation. The table is scoped to one
/// load; concurrent loads each build their own.
#[derive(Debug, Default)]
pub struct TypeTable {
    types: HashMap<String, Rc<TypeDefinition>>,
}

impl TypeTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Register a type definition under its name
    pub fn register(&mut self, name: impl Into<String>, definition: TypeDefinition) {
        self.types.insert(name.into(), Rc::new(definition));
    }

    /// Get a shared handle to a type by name
    pub fn get(&self, name: &str) -> Option<Rc<TypeDefinition>> {
        self.types.get(name).cloned()
    }

    /// Check if a type name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type names in sorted order, for diagnostics
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
