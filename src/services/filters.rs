// src/services/filters.rs

//! Record filtering and filter option derivation.

use std::collections::{BTreeSet, HashSet};

use crate::models::{ALL_OPTION, EntityRecord, FilterValue, SecondaryFilters};

/// Whether a record's field matches a selected value exactly.
fn field_matches(record: &EntityRecord, field: &str, expected: &str) -> bool {
    record
        .get(field)
        .and_then(|v| v.filter_key())
        .is_some_and(|key| key == expected)
}

/// Apply the primary filter and every active secondary filter.
///
/// Relative order of the input is preserved.
pub fn apply(
    records: &[EntityRecord],
    primary_field: &str,
    primary: &FilterValue,
    secondary: &SecondaryFilters,
) -> Vec<EntityRecord> {
    let active: Vec<(&str, &str)> = secondary
        .iter()
        .filter_map(|(field, value)| value.value().map(|v| (field.as_str(), v)))
        .collect();

    records
        .iter()
        .filter(|record| {
            primary
                .value()
                .is_none_or(|value| field_matches(record, primary_field, value))
        })
        .filter(|record| {
            active
                .iter()
                .all(|(field, value)| field_matches(record, field, value))
        })
        .cloned()
        .collect()
}

/// Primary options: `All` first, then unique trimmed non-blank values in
/// first-seen order.
pub fn primary_options(records: &[EntityRecord], field: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut options = vec![ALL_OPTION.to_string()];

    for value in records
        .iter()
        .filter_map(|r| r.get(field))
        .filter_map(|v| v.filter_key())
    {
        let trimmed = value.trim();
        if trimmed.is_empty() || !seen.insert(trimmed.to_string()) {
            continue;
        }
        options.push(trimmed.to_string());
    }

    options
}

/// Secondary options: unique non-blank values, sorted.
pub fn filter_options(field: &str, records: &[EntityRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.get(field))
        .filter_map(|v| v.filter_key())
        .filter(|s| !s.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Whether `value` is one of the concrete primary options for the records.
pub fn has_primary_value(records: &[EntityRecord], field: &str, value: &str) -> bool {
    primary_options(records, field)
        .iter()
        .skip(1)
        .any(|option| option == value)
}
