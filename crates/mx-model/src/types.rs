//! Schema AST produced by the loaders
//!
//! Both dialect loaders (XSD and Avro) normalize into these structures;
//! no downstream component is aware of the source format. Named types are
//! shared through `Rc` so that the resolver can hand the *same* definition
//! to every referencing element, and so that the extractor's cycle guard
//! can compare type identities instead of values.

use crate::field::{Multiplicity, Occurs};
use std::rc::Rc;

/// Whether a type is a leaf or a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Primitive or restricted scalar type; never has children
    Simple,

    /// Record-like type with named child elements
    Complex,
}

/// Restriction facets on a simple type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub pattern: Option<String>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub total_digits: Option<u32>,
    pub fraction_digits: Option<u32>,

    /// Avro `logicalType` annotation, surfaced as an informational facet
    pub logical_type: Option<String>,
}

impl Facets {
    /// True when no facet is set
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.total_digits.is_none()
            && self.fraction_digits.is_none()
            && self.logical_type.is_none()
    }
}

/// A named or anonymous type definition
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    /// Absent for inline/anonymous types
    pub name: Option<String>,

    pub kind: TypeKind,

    /// Base type of a restriction, if any
    pub base: Option<String>,

    /// Facets; only meaningful on `Simple` types
    pub facets: Facets,

    /// Ordered enumeration values, if the type is enumerated
    pub enumeration: Vec<String>,

    /// Ordered child declarations; only populated for `Complex` types
    pub children: Vec<ElementDeclaration>,
}

impl TypeDefinition {
    /// Create a simple type
    pub fn simple(name: Option<String>) -> Self {
        Self {
            name,
            kind: TypeKind::Simple,
            base: None,
            facets: Facets::default(),
            enumeration: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a complex type with the given children
    pub fn complex(name: Option<String>, children: Vec<ElementDeclaration>) -> Self {
        Self {
            name,
            kind: TypeKind::Complex,
            base: None,
            facets: Facets::default(),
            enumeration: Vec::new(),
            children,
        }
    }

    /// Set the restriction base
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Set facets
    pub fn with_facets(mut self, facets: Facets) -> Self {
        self.facets = facets;
        self
    }

    /// Set the enumeration values
    pub fn with_enumeration(mut self, values: Vec<String>) -> Self {
        self.enumeration = values;
        self
    }

    pub fn is_simple(&self) -> bool {
        self.kind == TypeKind::Simple
    }

    pub fn is_complex(&self) -> bool {
        self.kind == TypeKind::Complex
    }

    /// Name for diagnostics: the declared name or `"<anonymous>"`
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// Reference from an element to its type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// Name to resolve against the per-load type table
    Named(String),

    /// Built-in primitive of the source dialect (`xs:string`, Avro `int`)
    Builtin(String),

    /// Inline anonymous definition
    Inline(Rc<TypeDefinition>),
}

impl TypeRef {
    /// The referenced type name as written in the source, or the empty
    /// string for inline types
    pub fn declared_name(&self) -> &str {
        match self {
            TypeRef::Named(name) | TypeRef::Builtin(name) => name,
            TypeRef::Inline(_) => "",
        }
    }
}

/// A named slot inside a complex type
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDeclaration {
    pub name: String,

    /// `None` when the source declared neither a type name nor an inline
    /// type; the extractor treats that as a fatal structural error
    pub type_ref: Option<TypeRef>,

    pub min_occurs: u32,
    pub max_occurs: Occurs,

    /// Documentation text, possibly empty
    pub documentation: String,
}

impl ElementDeclaration {
    /// Create a `1..1` element with no type reference yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: None,
            min_occurs: 1,
            max_occurs: Occurs::Bounded(1),
            documentation: String::new(),
        }
    }

    /// Set the type reference
    pub fn with_type(mut self, type_ref: TypeRef) -> Self {
        self.type_ref = Some(type_ref);
        self
    }

    /// Set the occurrence bounds
    pub fn with_occurs(mut self, min: u32, max: Occurs) -> Self {
        self.min_occurs = min;
        self.max_occurs = max;
        self
    }

    /// Set the documentation text
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    /// Occurrence bounds as a multiplicity value
    pub fn multiplicity(&self) -> Multiplicity {
        Multiplicity::new(self.min_occurs, self.max_occurs)
    }
}
