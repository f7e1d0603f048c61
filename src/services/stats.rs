// src/services/stats.rs

//! Stat calculators and the fault-isolating evaluator.
//!
//! Every calculator is a plain `StatFn`. A calculator that hits a malformed
//! record returns `AppError::Computation`; `compute_stats` logs it and uses
//! the definition's fallback so sibling stats are unaffected.

use std::collections::HashSet;

use crate::error::{AppError, Result};
use crate::models::{DepartmentRecord, EntityRecord, StatDefinition, StatValue, StatsMap};

/// Sentinel shown when an average has no samples.
pub const NOT_AVAILABLE: &str = "N/A";

/// Evaluate every stat definition against the given records.
pub fn compute_stats(
    definitions: &[StatDefinition],
    records: &[EntityRecord],
    departments: &[DepartmentRecord],
) -> StatsMap {
    definitions
        .iter()
        .map(|def| {
            let value = (def.calculate)(records, departments).unwrap_or_else(|e| {
                log::warn!("Stat '{}' failed, using {}: {}", def.name, def.fallback, e);
                def.fallback.clone()
            });
            (def.name.to_string(), value)
        })
        .collect()
}

fn status_is(record: &EntityRecord, field: &str, expected: &str) -> bool {
    record
        .text(field)
        .is_some_and(|s| s.trim().eq_ignore_ascii_case(expected))
}

fn count_numeric_at_least(
    stat: &str,
    records: &[EntityRecord],
    field: &str,
    threshold: f64,
) -> Result<StatValue> {
    let mut count = 0;
    for record in records {
        let value = record
            .numeric(field)
            .map_err(|e| AppError::computation(stat, format!("record {}: {e}", record.id)))?;
        if value >= threshold {
            count += 1;
        }
    }
    Ok(StatValue::Count(count))
}

pub fn total_records(records: &[EntityRecord], _: &[DepartmentRecord]) -> Result<StatValue> {
    Ok(StatValue::Count(records.len()))
}

pub fn active_students(records: &[EntityRecord], _: &[DepartmentRecord]) -> Result<StatValue> {
    Ok(records.iter().filter(|r| status_is(r, "status", "active")).count().into())
}

pub fn graduated_students(records: &[EntityRecord], _: &[DepartmentRecord]) -> Result<StatValue> {
    Ok(records.iter().filter(|r| status_is(r, "status", "graduated")).count().into())
}

/// Students with a GPA of at least 3.5.
pub fn top_performers(records: &[EntityRecord], _: &[DepartmentRecord]) -> Result<StatValue> {
    count_numeric_at_least("topPerformers", records, "gpa", 3.5)
}

/// Mean of positive ratings to one decimal, or `N/A` when there are none.
pub fn average_rating(records: &[EntityRecord], _: &[DepartmentRecord]) -> Result<StatValue> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for record in records {
        let rating = record.numeric("rating").map_err(|e| {
            AppError::computation("averageRating", format!("record {}: {e}", record.id))
        })?;
        if rating > 0.0 {
            sum += rating;
            count += 1;
        }
    }

    if count == 0 {
        return Ok(StatValue::Text(NOT_AVAILABLE.to_string()));
    }
    Ok(StatValue::Text(format!("{:.1}", sum / count as f64)))
}

/// Lecturers rated 4.5 or higher.
pub fn top_rated_lecturers(records: &[EntityRecord], _: &[DepartmentRecord]) -> Result<StatValue> {
    count_numeric_at_least("topPerformers", records, "rating", 4.5)
}

pub fn full_time_lecturers(records: &[EntityRecord], _: &[DepartmentRecord]) -> Result<StatValue> {
    Ok(records
        .iter()
        .filter(|r| status_is(r, "employmentType", "full-time"))
        .count()
        .into())
}

/// Department list size, or distinct record departments when the list is empty.
pub fn total_departments(
    records: &[EntityRecord],
    departments: &[DepartmentRecord],
) -> Result<StatValue> {
    if !departments.is_empty() {
        return Ok(StatValue::Count(departments.len()));
    }

    let distinct: HashSet<&str> = records
        .iter()
        .filter_map(|r| r.text("department"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    Ok(StatValue::Count(distinct.len()))
}
