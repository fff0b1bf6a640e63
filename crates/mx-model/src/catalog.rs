//! Flat field catalog produced by one extraction pass

use crate::field::FieldDescriptor;
use serde::Serialize;

/// The ordered, flattened list of field descriptors for one schema
///
/// Catalogs from distinct loads share no state; comparison across schema
/// versions works on two independent catalogs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    /// Message type identifier (`pain.001.001.09`, Avro record name, ...)
    #[serde(rename = "messageType")]
    pub message_type: String,

    /// Descriptors in pre-order traversal order
    pub fields: Vec<FieldDescriptor>,

    /// Catalog-level warnings (recursive type diagnostics, skipped
    /// duplicate paths); per-field issues live on the descriptors
    pub warnings: Vec<String>,
}

/// Summary counts over one catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_fields: usize,
    pub mandatory_count: usize,
    pub optional_count: usize,
    pub with_code_lists: usize,
    pub with_patterns: usize,
    pub truncated_count: usize,
    pub max_depth: usize,
}

impl Catalog {
    /// Create an empty catalog for the given message type
    pub fn new(message_type: impl Into<String>) -> Self {
        Self {
            message_type: message_type.into(),
            fields: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate descriptors in catalog order
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    /// All mandatory fields, in catalog order
    pub fn mandatory(&self) -> Vec<&FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_mandatory()).collect()
    }

    /// All optional fields, in catalog order
    pub fn optional(&self) -> Vec<&FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_optional()).collect()
    }

    /// Look up a field by its full path
    pub fn by_path(&self, path: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.path == path)
    }

    /// All fields with the given name, regardless of nesting level
    pub fn by_name(&self, name: &str) -> Vec<&FieldDescriptor> {
        self.fields.iter().filter(|f| f.name == name).collect()
    }

    /// Compute summary statistics
    pub fn stats(&self, separator: char) -> CatalogStats {
        CatalogStats {
            total_fields: self.fields.len(),
            mandatory_count: self.mandatory().len(),
            optional_count: self.optional().len(),
            with_code_lists: self
                .fields
                .iter()
                .filter(|f| !f.constraints.code_list.is_empty())
                .count(),
            with_patterns: self
                .fields
                .iter()
                .filter(|f| f.constraints.pattern.is_some())
                .count(),
            truncated_count: self.fields.iter().filter(|f| f.truncated).count(),
            max_depth: self
                .fields
                .iter()
                .map(|f| f.depth(separator))
                .max()
                .unwrap_or(0),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ConstraintSet, Multiplicity, Occurs};

    fn field(path: &str, min: u32) -> FieldDescriptor {
        let multiplicity = Multiplicity::new(min, Occurs::Bounded(1));
        FieldDescriptor {
            name: path.rsplit('/').next().unwrap().to_string(),
            path: path.to_string(),
            data_type: String::new(),
            multiplicity,
            requirement: multiplicity.requirement(),
            definition: String::new(),
            constraints: ConstraintSet::default(),
            truncated: false,
            warnings: Vec::new(),
        }
    }

    fn sample() -> Catalog {
        let mut catalog = Catalog::new("pain.001.001.09");
        catalog.fields.push(field("Document", 1));
        catalog.fields.push(field("Document/Nm", 1));
        catalog.fields.push(field("Document/Age", 0));
        catalog
    }

    #[test]
    fn test_lookup_by_path() {
        let catalog = sample();
        assert!(catalog.by_path("Document/Nm").is_some());
        assert!(catalog.by_path("Document/Missing").is_none());
    }

    #[test]
    fn test_lookup_by_name() {
        let catalog = sample();
        assert_eq!(catalog.by_name("Nm").len(), 1);
        assert!(catalog.by_name("Other").is_empty());
    }

    #[test]
    fn test_mandatory_optional_split() {
        let catalog = sample();
        assert_eq!(catalog.mandatory().len(), 2);
        assert_eq!(catalog.optional().len(), 1);
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats('/');
        assert_eq!(stats.total_fields, 3);
        assert_eq!(stats.mandatory_count, 2);
        assert_eq!(stats.optional_count, 1);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.truncated_count, 0);
    }
}
