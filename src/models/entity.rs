// src/models/entity.rs

//! Per-entity-type dashboard configuration structures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{DepartmentRecord, EntityRecord};

/// Supported record categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Students,
    Lecturers,
}

impl EntityType {
    pub const ALL: [EntityType; 2] = [EntityType::Students, EntityType::Lecturers];

    /// Key used on the wire and in REST paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Students => "students",
            EntityType::Lecturers => "lecturers",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "students" | "student" => Ok(EntityType::Students),
            "lecturers" | "lecturer" => Ok(EntityType::Lecturers),
            _ => Err(AppError::UnknownEntityType(s.to_string())),
        }
    }
}

/// Outcome of resolving a raw entity-type key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Known(EntityType),
    Unknown(String),
}

impl Resolution {
    pub fn is_known(&self) -> bool {
        matches!(self, Resolution::Known(_))
    }
}

/// How a secondary filter is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Single-select dropdown
    Select,
    /// Button group where re-selecting the active value clears it
    Buttons,
}

/// A secondary filter on a record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDefinition {
    /// Record field key
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
}

/// Computed statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Count(usize),
    Text(String),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Count(n) => write!(f, "{n}"),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<usize> for StatValue {
    fn from(value: usize) -> Self {
        StatValue::Count(value)
    }
}

/// Stat calculator over the filtered records and the department list.
pub type StatFn = fn(&[EntityRecord], &[DepartmentRecord]) -> Result<StatValue>;

/// A named statistic and the value used when its calculator fails.
#[derive(Debug, Clone)]
pub struct StatDefinition {
    pub name: &'static str,
    pub calculate: StatFn,
    pub fallback: StatValue,
}

/// Filter mutation triggered by clicking a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    /// Clear primary and secondary filters
    ResetFilters,
    /// Select a secondary filter value
    SetFilter {
        field: &'static str,
        value: &'static str,
    },
    /// Display-only card
    None,
}

/// Card metadata (presentation styling is resolved separately by card id).
#[derive(Debug, Clone)]
pub struct CardDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub stat_key: &'static str,
    pub action: CardAction,
}

/// Input widget for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormFieldKind {
    Text,
    Email,
    Number,
    /// Options come from the department list
    Department,
    /// Options derived from the selected department's year count
    AcademicYear,
    /// Fixed option list
    Choice(&'static [&'static str]),
}

/// A field on the add/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Record field key
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FormFieldKind,
    pub required: bool,
}

/// Dashboard configuration for one entity type.
#[derive(Debug, Clone)]
pub struct EntityConfig {
    pub entity_type: EntityType,
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Singular display name (e.g., "Student")
    pub entity_name: &'static str,
    pub primary_filter_field: &'static str,
    pub primary_filter_label: &'static str,
    pub secondary_filters: Vec<FilterDefinition>,
    pub stats: Vec<StatDefinition>,
    pub cards: Vec<CardDefinition>,
    pub form_fields: Vec<FormField>,
}

impl EntityConfig {
    /// Find a secondary filter definition by field key.
    pub fn secondary_filter(&self, name: &str) -> Option<&FilterDefinition> {
        self.secondary_filters.iter().find(|f| f.name == name)
    }

    /// Find a card definition by id.
    pub fn card(&self, id: &str) -> Option<&CardDefinition> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Declared stat names in order.
    pub fn stat_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stats.iter().map(|s| s.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_from_str() {
        assert_eq!("students".parse::<EntityType>().unwrap(), EntityType::Students);
        assert_eq!(" Lecturers ".parse::<EntityType>().unwrap(), EntityType::Lecturers);
        assert!(matches!(
            "staff".parse::<EntityType>(),
            Err(AppError::UnknownEntityType(_))
        ));
    }

    #[test]
    fn test_stat_value_display() {
        assert_eq!(StatValue::Count(3).to_string(), "3");
        assert_eq!(StatValue::Text("4.5".into()).to_string(), "4.5");
    }
}
