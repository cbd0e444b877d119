//! Header gate: unknown, duplicate and missing-required columns.

use crate::config::ColumnCatalog;

/// Check header columns against the catalog.
///
/// Checks run in order and stop at the first category with any members, so the message names one
/// problem kind only:
///
/// 1. unknown columns (every offending header entry, in header order)
/// 2. duplicate columns (each name once, first-seen order)
/// 3. missing required columns (required-list order)
///
/// Returns `None` when the header is acceptable.
pub fn validate_columns(columns: &[String], catalog: &ColumnCatalog) -> Option<String> {
    let unknown: Vec<&str> = columns
        .iter()
        .map(String::as_str)
        .filter(|c| !catalog.is_recognized(c))
        .collect();
    if !unknown.is_empty() {
        return Some(format!(
            "These columns are invalid: ({})...Supported columns are: ({})",
            unknown.join(", "),
            catalog.names().collect::<Vec<_>>().join(", ")
        ));
    }

    let mut duplicates: Vec<&str> = Vec::new();
    for (idx, col) in columns.iter().enumerate() {
        if columns[..idx].contains(col) && !duplicates.contains(&col.as_str()) {
            duplicates.push(col);
        }
    }
    if !duplicates.is_empty() {
        return Some(format!(
            "The following columns appear to be duplicate, this could result in an error:...{}",
            duplicates.join(", ")
        ));
    }

    let missing: Vec<&str> = catalog
        .required()
        .iter()
        .map(String::as_str)
        .filter(|r| !columns.iter().any(|c| c == r))
        .collect();
    if !missing.is_empty() {
        return Some(format!(
            "The following fields are required but missing:...{}",
            missing.join(", ")
        ));
    }

    None
}
