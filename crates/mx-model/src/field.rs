//! Field descriptors and multiplicity for the flat catalog

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Upper occurrence bound of an element or field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurs {
    /// A concrete upper bound
    Bounded(u32),

    /// No upper limit (`maxOccurs="unbounded"` / Avro arrays)
    Unbounded,
}

impl fmt::Display for Occurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occurs::Bounded(n) => write!(f, "{n}"),
            Occurs::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Occurrence bounds of an element, rendered as `"min..max"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplicity {
    /// Minimum occurrences
    pub min: u32,

    /// Maximum occurrences
    pub max: Occurs,
}

impl Multiplicity {
    /// Create a multiplicity from explicit bounds
    pub fn new(min: u32, max: Occurs) -> Self {
        Self { min, max }
    }

    /// The default `1..1` multiplicity
    pub fn required_single() -> Self {
        Self::new(1, Occurs::Bounded(1))
    }

    /// `0..1`
    pub fn optional_single() -> Self {
        Self::new(0, Occurs::Bounded(1))
    }

    /// Check the `min <= max` invariant (always holds for unbounded max)
    pub fn is_valid(&self) -> bool {
        match self.max {
            Occurs::Bounded(max) => self.min <= max,
            Occurs::Unbounded => true,
        }
    }

    /// Whether more than one occurrence is allowed
    pub fn is_repeatable(&self) -> bool {
        match self.max {
            Occurs::Bounded(max) => max > 1,
            Occurs::Unbounded => true,
        }
    }

    /// Derive the requirement classification: mandatory iff `min >= 1`
    pub fn requirement(&self) -> Requirement {
        if self.min >= 1 {
            Requirement::Mandatory
        } else {
            Requirement::Optional
        }
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

impl Serialize for Multiplicity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Requirement classification of a field
///
/// `Conditional` is never derived from the schema structure; it exists so
/// that business-rule layers can assign it on top of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Mandatory,
    Optional,
    Conditional,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Mandatory => write!(f, "mandatory"),
            Requirement::Optional => write!(f, "optional"),
            Requirement::Conditional => write!(f, "conditional"),
        }
    }
}

/// Resolved constraints attached to one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    /// Verbatim pattern facet; never reinterpreted between dialects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_digits: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraction_digits: Option<u32>,

    /// Avro logical type annotation (`date`, `timestamp-millis`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_type: Option<String>,

    /// Full ordered enumeration; display truncation is an exporter concern
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub code_list: Vec<String>,
}

impl ConstraintSet {
    /// True when no constraint is present at all
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
            && self.total_digits.is_none()
            && self.fraction_digits.is_none()
            && self.logical_type.is_none()
            && self.code_list.is_empty()
    }

    /// Whether a length bound is present
    pub fn has_length(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }
}

/// One entry of the flat field catalog
///
/// An immutable value: it owns all of its data and holds no references
/// back into the schema AST.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Last path segment
    pub name: String,

    /// Full path from the declared root; unique within one catalog
    pub path: String,

    /// Name of the declared type, or the empty string for inline types
    pub data_type: String,

    /// Occurrence bounds as declared on the owning element; never
    /// propagated from ancestors
    pub multiplicity: Multiplicity,

    /// Derived from `multiplicity.min`
    pub requirement: Requirement,

    /// Documentation text from the schema, possibly empty
    pub definition: String,

    /// Resolved facet and enumeration constraints
    pub constraints: ConstraintSet,

    /// Set when recursion was cut at this field by the cycle guard
    pub truncated: bool,

    /// Non-fatal issues recorded while building this descriptor
    pub warnings: Vec<String>,
}

impl FieldDescriptor {
    pub fn is_mandatory(&self) -> bool {
        self.requirement == Requirement::Mandatory
    }

    pub fn is_optional(&self) -> bool {
        self.requirement == Requirement::Optional
    }

    /// Nesting depth of the field, counted in path segments
    pub fn depth(&self, separator: char) -> usize {
        self.path.split(separator).count()
    }
}

impl Serialize for FieldDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("FieldDescriptor", 9)?;
        s.serialize_field("fieldName", &self.name)?;
        s.serialize_field("path", &self.path)?;
        s.serialize_field("dataType", &self.data_type)?;
        s.serialize_field("multiplicity", &self.multiplicity)?;
        s.serialize_field("requirement", &self.requirement)?;
        s.serialize_field("definition", &self.definition)?;
        s.serialize_field("constraints", &self.constraints)?;
        s.serialize_field("truncated", &self.truncated)?;
        s.serialize_field("warnings", &self.warnings)?;
        s.end()
    }
}
