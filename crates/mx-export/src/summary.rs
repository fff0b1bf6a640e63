//! Single-line constraint rendering shared by the CSV and Markdown
//! exporters

use mx_model::FieldDescriptor;

/// How many code-list entries are spelled out before eliding the rest.
/// Display-level only; the catalog itself always carries the full list.
const CODE_DISPLAY_LIMIT: usize = 5;

/// Render a descriptor's constraints as `"Key: value; Key: value"`,
/// or `"None"` when there is nothing to say
pub fn constraint_summary(field: &FieldDescriptor) -> String {
    let constraints = &field.constraints;
    let mut parts = Vec::new();

    if let Some(max) = constraints.max_length {
        parts.push(format!("MaxLength: {max}"));
    }
    if let Some(min) = constraints.min_length {
        parts.push(format!("MinLength: {min}"));
    }
    if let Some(pattern) = &constraints.pattern {
        parts.push(format!("Pattern: {pattern}"));
    }
    if let Some(total) = constraints.total_digits {
        parts.push(format!("TotalDigits: {total}"));
    }
    if let Some(fraction) = constraints.fraction_digits {
        parts.push(format!("FractionDigits: {fraction}"));
    }
    if let Some(logical) = &constraints.logical_type {
        parts.push(format!("LogicalType: {logical}"));
    }
    if !constraints.code_list.is_empty() {
        let shown: Vec<&str> = constraints
            .code_list
            .iter()
            .take(CODE_DISPLAY_LIMIT)
            .map(String::as_str)
            .collect();
        let mut codes = shown.join(", ");
        let hidden = constraints.code_list.len().saturating_sub(CODE_DISPLAY_LIMIT);
        if hidden > 0 {
            codes.push_str(&format!(" (+ {hidden} more)"));
        }
        parts.push(format!("Codes: {codes}"));
    }

    if parts.is_empty() {
        "None".to_string()
    } else {
        parts.join("; ")
    }
}
