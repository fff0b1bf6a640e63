//! Constraint derivation from resolved type definitions

use mx_model::{ConstraintSet, TypeDefinition};
use tracing::trace;

/// Derive the constraint set for a resolved type
///
/// Returns the constraints plus any non-fatal warnings; a malformed facet
/// never aborts extraction, it is recorded against the one field that
/// carries it.
pub fn extract_constraints(definition: &TypeDefinition) -> (ConstraintSet, Vec<String>) {
    let mut warnings = Vec::new();
    let facets = &definition.facets;
    let mut constraints = ConstraintSet {
        min_length: facets.min_length,
        max_length: facets.max_length,
        pattern: facets.pattern.clone(),
        total_digits: facets.total_digits,
        fraction_digits: facets.fraction_digits,
        logical_type: facets.logical_type.clone(),
        code_list: definition.enumeration.clone(),
    };

    // The pattern stays verbatim either way; a non-compiling one is
    // surfaced so downstream validation knows not to trust it.
    if let Some(pattern) = &constraints.pattern {
        if let Err(error) = regex::Regex::new(pattern) {
            warnings.push(format!("pattern does not compile: {error}"));
        }
    }

    if let (Some(total), Some(fraction)) = (constraints.total_digits, constraints.fraction_digits) {
        if fraction > total {
            warnings.push(format!(
                "fractionDigits {fraction} exceeds totalDigits {total}"
            ));
        }
    }

    // ISO 20022 length-named types (Max35Text and friends) imply their
    // bound even when the schema states no maxLength facet.
    if constraints.max_length.is_none() {
        if let Some(name) = &definition.name {
            if let Some(limit) = length_from_type_name(name) {
                trace!(name, limit, "Inferred max length from type name");
                constraints.max_length = Some(limit);
            }
        }
    }

    (constraints, warnings)
}

fn length_from_type_name(name: &str) -> Option<u32> {
    let pattern = regex::Regex::new(r"^Max(\d+)Text$").ok()?;
    pattern
        .captures(name)
        .and_then(|captures| captures[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_model::Facets;

    #[test]
    fn test_facets_copied_through() {
        let definition = TypeDefinition::simple(Some("IBAN2007Identifier".to_string()))
            .with_base("string")
            .with_facets(Facets {
                pattern: Some("[A-Z]{2}[0-9]{2}[a-zA-Z0-9]{1,30}".to_string()),
                min_length: Some(1),
                max_length: Some(34),
                ..Facets::default()
            });

        let (constraints, warnings) = extract_constraints(&definition);
        assert!(warnings.is_empty());
        assert_eq!(constraints.min_length, Some(1));
        assert_eq!(constraints.max_length, Some(34));
        assert_eq!(
            constraints.pattern.as_deref(),
            Some("[A-Z]{2}[0-9]{2}[a-zA-Z0-9]{1,30}")
        );
    }

    #[test]
    fn test_bad_pattern_is_a_warning_not_an_error() {
        let definition = TypeDefinition::simple(Some("Broken".to_string())).with_facets(Facets {
            pattern: Some("[unclosed".to_string()),
            ..Facets::default()
        });

        let (constraints, warnings) = extract_constraints(&definition);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("pattern does not compile"));
        // Verbatim pattern is still carried.
        assert_eq!(constraints.pattern.as_deref(), Some("[unclosed"));
    }

    #[test]
    fn test_digit_count_sanity_warning() {
        let definition = TypeDefinition::simple(Some("Amount".to_string())).with_facets(Facets {
            total_digits: Some(5),
            fraction_digits: Some(7),
            ..Facets::default()
        });

        let (_, warnings) = extract_constraints(&definition);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("exceeds totalDigits"));
    }

    #[test]
    fn test_max_length_inferred_from_type_name() {
        let definition = TypeDefinition::simple(Some("Max35Text".to_string()));
        let (constraints, _) = extract_constraints(&definition);
        assert_eq!(constraints.max_length, Some(35));

        // An explicit facet wins over the name.
        let explicit = TypeDefinition::simple(Some("Max35Text".to_string())).with_facets(Facets {
            max_length: Some(20),
            ..Facets::default()
        });
        let (constraints, _) = extract_constraints(&explicit);
        assert_eq!(constraints.max_length, Some(20));
    }

    #[test]
    fn test_code_list_order_preserved() {
        let definition = TypeDefinition::simple(Some("Code".to_string()))
            .with_enumeration(vec!["AUTH".to_string(), "FDET".to_string()]);
        let (constraints, _) = extract_constraints(&definition);
        assert_eq!(constraints.code_list, vec!["AUTH", "FDET"]);
    }

    #[test]
    fn test_logical_type_carried() {
        let definition = TypeDefinition::simple(None).with_base("int").with_facets(Facets {
            logical_type: Some("date".to_string()),
            ..Facets::default()
        });
        let (constraints, _) = extract_constraints(&definition);
        assert_eq!(constraints.logical_type.as_deref(), Some("date"));
    }
}
