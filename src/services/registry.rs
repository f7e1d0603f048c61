// src/services/registry.rs

//! Per-entity-type configuration registry.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::models::{
    CardAction, CardDefinition, EntityConfig, EntityType, FilterDefinition, FilterKind, FormField,
    FormFieldKind, Resolution, StatDefinition, StatValue,
};
use crate::services::stats::{self, NOT_AVAILABLE};

/// Fixed lookup of dashboard configurations.
#[derive(Debug, Clone)]
pub struct ConfigRegistry {
    configs: HashMap<EntityType, EntityConfig>,
}

impl ConfigRegistry {
    /// Registry with the built-in student and lecturer configurations.
    pub fn new() -> Self {
        let configs = EntityType::ALL
            .into_iter()
            .map(|ty| (ty, defaults::config_for(ty)))
            .collect();
        Self { configs }
    }

    /// Replace the configuration registered for `config.entity_type`.
    pub fn with_config(mut self, config: EntityConfig) -> Self {
        self.configs.insert(config.entity_type, config);
        self
    }

    /// Classify a raw entity-type key.
    pub fn resolve(&self, entity_type: &str) -> Resolution {
        match entity_type.parse::<EntityType>() {
            Ok(ty) if self.configs.contains_key(&ty) => Resolution::Known(ty),
            _ => Resolution::Unknown(entity_type.to_string()),
        }
    }

    /// Strict lookup: unknown types are an error.
    pub fn get(&self, entity_type: &str) -> Result<&EntityConfig> {
        match self.resolve(entity_type) {
            Resolution::Known(ty) => Ok(self.config(ty)),
            Resolution::Unknown(raw) => Err(AppError::UnknownEntityType(raw)),
        }
    }

    /// Lenient lookup: unknown types get the students configuration and the
    /// caller is told via `Resolution::Unknown`.
    pub fn get_or_default(&self, entity_type: &str) -> (&EntityConfig, Resolution) {
        let resolution = self.resolve(entity_type);
        let config = match &resolution {
            Resolution::Known(ty) => self.config(*ty),
            Resolution::Unknown(raw) => {
                log::warn!("Unknown entity type '{raw}', falling back to students");
                self.config(EntityType::Students)
            }
        };
        (config, resolution)
    }

    /// Configuration for a known entity type.
    pub fn config(&self, entity_type: EntityType) -> &EntityConfig {
        // Every EntityType is registered in `new`.
        &self.configs[&entity_type]
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}

mod defaults {
    use super::*;

    const STUDENT_STATUSES: &[&str] = &["Active", "Inactive", "Graduated", "Suspended"];
    const EMPLOYMENT_TYPES: &[&str] = &["Full-time", "Part-time", "Visiting"];

    fn count_stat(name: &'static str, calculate: crate::models::StatFn) -> StatDefinition {
        StatDefinition {
            name,
            calculate,
            fallback: StatValue::Count(0),
        }
    }

    fn field(
        name: &'static str,
        label: &'static str,
        kind: FormFieldKind,
        required: bool,
    ) -> FormField {
        FormField {
            name,
            label,
            kind,
            required,
        }
    }

    pub fn config_for(entity_type: EntityType) -> EntityConfig {
        match entity_type {
            EntityType::Students => students(),
            EntityType::Lecturers => lecturers(),
        }
    }

    fn students() -> EntityConfig {
        EntityConfig {
            entity_type: EntityType::Students,
            title: "Students Dashboard",
            subtitle: "Manage and monitor student records",
            entity_name: "Student",
            primary_filter_field: "department",
            primary_filter_label: "Departments",
            secondary_filters: vec![
                FilterDefinition {
                    name: "status",
                    label: "Status",
                    kind: FilterKind::Buttons,
                },
                FilterDefinition {
                    name: "academicYear",
                    label: "Academic Year",
                    kind: FilterKind::Select,
                },
            ],
            stats: vec![
                count_stat("totalStudents", stats::total_records),
                count_stat("activeStudents", stats::active_students),
                count_stat("graduatedStudents", stats::graduated_students),
                count_stat("topPerformers", stats::top_performers),
            ],
            cards: vec![
                CardDefinition {
                    id: "total",
                    title: "Total Students",
                    stat_key: "totalStudents",
                    action: CardAction::ResetFilters,
                },
                CardDefinition {
                    id: "active",
                    title: "Active Students",
                    stat_key: "activeStudents",
                    action: CardAction::SetFilter {
                        field: "status",
                        value: "Active",
                    },
                },
                CardDefinition {
                    id: "graduated",
                    title: "Graduated",
                    stat_key: "graduatedStudents",
                    action: CardAction::SetFilter {
                        field: "status",
                        value: "Graduated",
                    },
                },
                CardDefinition {
                    id: "top",
                    title: "Top Performers",
                    stat_key: "topPerformers",
                    action: CardAction::None,
                },
            ],
            form_fields: vec![
                field("name", "Full Name", FormFieldKind::Text, true),
                field("email", "Email", FormFieldKind::Email, true),
                field("department", "Department", FormFieldKind::Department, true),
                field("academicYear", "Academic Year", FormFieldKind::AcademicYear, true),
                field("status", "Status", FormFieldKind::Choice(STUDENT_STATUSES), true),
                field("gpa", "GPA", FormFieldKind::Number, false),
            ],
        }
    }

    fn lecturers() -> EntityConfig {
        EntityConfig {
            entity_type: EntityType::Lecturers,
            title: "Lecturers Dashboard",
            subtitle: "Manage and monitor teaching staff",
            entity_name: "Lecturer",
            primary_filter_field: "department",
            primary_filter_label: "Departments",
            secondary_filters: vec![
                FilterDefinition {
                    name: "employmentType",
                    label: "Employment Type",
                    kind: FilterKind::Buttons,
                },
                FilterDefinition {
                    name: "specialization",
                    label: "Specialization",
                    kind: FilterKind::Select,
                },
            ],
            stats: vec![
                count_stat("totalLecturers", stats::total_records),
                StatDefinition {
                    name: "averageRating",
                    calculate: stats::average_rating,
                    fallback: StatValue::Text(NOT_AVAILABLE.to_string()),
                },
                count_stat("topPerformers", stats::top_rated_lecturers),
                count_stat("totalDepartments", stats::total_departments),
                count_stat("fullTimeLecturers", stats::full_time_lecturers),
            ],
            cards: vec![
                CardDefinition {
                    id: "total",
                    title: "Total Lecturers",
                    stat_key: "totalLecturers",
                    action: CardAction::ResetFilters,
                },
                CardDefinition {
                    id: "rating",
                    title: "Average Rating",
                    stat_key: "averageRating",
                    action: CardAction::None,
                },
                CardDefinition {
                    id: "top",
                    title: "Top Rated",
                    stat_key: "topPerformers",
                    action: CardAction::None,
                },
                CardDefinition {
                    id: "departments",
                    title: "Departments",
                    stat_key: "totalDepartments",
                    action: CardAction::None,
                },
                CardDefinition {
                    id: "fulltime",
                    title: "Full-time Staff",
                    stat_key: "fullTimeLecturers",
                    action: CardAction::SetFilter {
                        field: "employmentType",
                        value: "Full-time",
                    },
                },
            ],
            form_fields: vec![
                field("name", "Full Name", FormFieldKind::Text, true),
                field("email", "Email", FormFieldKind::Email, true),
                field("department", "Department", FormFieldKind::Department, true),
                field("specialization", "Specialization", FormFieldKind::Text, true),
                field(
                    "employmentType",
                    "Employment Type",
                    FormFieldKind::Choice(EMPLOYMENT_TYPES),
                    true,
                ),
                field("experience", "Years of Experience", FormFieldKind::Number, false),
                field("rating", "Rating", FormFieldKind::Number, false),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_lookup() {
        let registry = ConfigRegistry::new();
        let config = registry.get("lecturers").unwrap();
        assert_eq!(config.entity_type, EntityType::Lecturers);
        assert_eq!(config.primary_filter_field, "department");
    }

    #[test]
    fn test_unknown_lookup_is_rejected() {
        let registry = ConfigRegistry::new();
        assert!(matches!(
            registry.get("courses"),
            Err(AppError::UnknownEntityType(ref raw)) if raw == "courses"
        ));
    }

    #[test]
    fn test_get_or_default_flags_fallback() {
        let registry = ConfigRegistry::new();
        let (config, resolution) = registry.get_or_default("courses");
        assert_eq!(config.entity_type, EntityType::Students);
        assert_eq!(resolution, Resolution::Unknown("courses".to_string()));

        let (_, resolution) = registry.get_or_default("students");
        assert!(resolution.is_known());
    }

    #[test]
    fn test_cards_reference_declared_stats() {
        let registry = ConfigRegistry::new();
        for ty in EntityType::ALL {
            let config = registry.config(ty);
            let names: Vec<_> = config.stat_names().collect();
            for card in &config.cards {
                assert!(
                    names.contains(&card.stat_key),
                    "{ty}: card {} refers to missing stat {}",
                    card.id,
                    card.stat_key
                );
            }
        }
    }

    #[test]
    fn test_card_filters_target_secondary_filters() {
        let registry = ConfigRegistry::new();
        for ty in EntityType::ALL {
            let config = registry.config(ty);
            for card in &config.cards {
                if let CardAction::SetFilter { field, .. } = card.action {
                    assert!(config.secondary_filter(field).is_some());
                }
            }
        }
    }
}
