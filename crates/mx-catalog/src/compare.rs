//! Structural diff between two catalogs of the same message family

use mx_model::{Catalog, Multiplicity, Requirement};
use serde::Serialize;
use std::collections::BTreeMap;

/// One field whose declaration changed between catalog versions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub path: String,
    pub old_multiplicity: Multiplicity,
    pub new_multiplicity: Multiplicity,
    pub old_requirement: Requirement,
    pub new_requirement: Requirement,
}

/// Added, removed, and changed paths, each sorted lexically
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<FieldChange>,
}

impl CatalogDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Diff two catalogs by path
///
/// A path counts as changed when its multiplicity or data type differs;
/// requirement follows multiplicity so it is reported alongside. Output
/// order is sorted, not declaration order, so diffs of the same pair are
/// always identical.
pub fn compare(old: &Catalog, new: &Catalog) -> CatalogDiff {
    let old_by_path: BTreeMap<&str, _> = old.iter().map(|f| (f.path.as_str(), f)).collect();
    let new_by_path: BTreeMap<&str, _> = new.iter().map(|f| (f.path.as_str(), f)).collect();

    let mut diff = CatalogDiff::default();

    for (path, field) in &new_by_path {
        match old_by_path.get(path) {
            None => diff.added.push((*path).to_string()),
            Some(previous) => {
                if previous.multiplicity != field.multiplicity
                    || previous.data_type != field.data_type
                {
                    diff.changed.push(FieldChange {
                        path: (*path).to_string(),
                        old_multiplicity: previous.multiplicity,
                        new_multiplicity: field.multiplicity,
                        old_requirement: previous.requirement,
                        new_requirement: field.requirement,
                    });
                }
            }
        }
    }
    for path in old_by_path.keys() {
        if !new_by_path.contains_key(path) {
            diff.removed.push((*path).to_string());
        }
    }
    diff
}
