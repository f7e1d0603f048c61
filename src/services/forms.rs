// src/services/forms.rs

//! Form field validation and option lists for the add/edit form.

use std::collections::{BTreeMap, HashSet};

use crate::error::{AppError, Result};
use crate::models::{
    DepartmentRecord, EntityRecord, FieldMap, FieldValue, FormField, FormFieldKind,
};

/// Raw form input keyed by field name.
pub type FormData = BTreeMap<String, String>;

/// Years offered when a department does not say.
const DEFAULT_ACADEMIC_YEARS: u32 = 4;

/// Validate form input against the configured fields.
///
/// Every failing field is collected before returning, so the caller can
/// show all problems at once. On success the input is converted into a
/// typed field map; blank optional fields become null so an edit can
/// clear them.
pub fn validate_fields(fields: &[FormField], data: &FormData) -> Result<FieldMap> {
    let mut errors = Vec::new();
    let mut values = FieldMap::new();

    for field in fields {
        let raw = data.get(field.name).map(|s| s.trim()).unwrap_or("");
        if raw.is_empty() {
            if field.required {
                errors.push(format!("{} is required", field.label));
            } else {
                values.insert(field.name.to_string(), FieldValue::null());
            }
            continue;
        }

        match field.kind {
            FormFieldKind::Number => match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => {
                    values.insert(field.name.to_string(), FieldValue::Number(n));
                }
                _ => errors.push(format!("{} must be a number", field.label)),
            },
            FormFieldKind::Email if !looks_like_email(raw) => {
                errors.push(format!("{} must be a valid email address", field.label));
            }
            FormFieldKind::Choice(options) if !options.iter().any(|o| *o == raw) => {
                errors.push(format!("{} must be one of: {}", field.label, options.join(", ")));
            }
            _ => {
                values.insert(field.name.to_string(), FieldValue::Text(raw.to_string()));
            }
        }
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(AppError::validation(errors))
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// Pre-fill form input from an existing record.
pub fn form_data_from_record(fields: &[FormField], record: &EntityRecord) -> FormData {
    fields
        .iter()
        .filter_map(|f| {
            record
                .get(f.name)
                .map(|value| (f.name.to_string(), value.to_string()))
        })
        .collect()
}

/// Department names for the department select.
pub fn department_options(departments: &[DepartmentRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    departments
        .iter()
        .map(|d| d.name.trim())
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Academic years offered by a department (`Year 1` .. `Year N`).
pub fn academic_year_options(departments: &[DepartmentRecord], department: &str) -> Vec<String> {
    let years = departments
        .iter()
        .find(|d| d.name.trim() == department.trim())
        .and_then(|d| d.total_years)
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_ACADEMIC_YEARS);

    (1..=years).map(|year| format!("Year {year}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUSES: &[&str] = &["Active", "Graduated"];

    fn fields() -> Vec<FormField> {
        vec![
            FormField {
                name: "name",
                label: "Full Name",
                kind: FormFieldKind::Text,
                required: true,
            },
            FormField {
                name: "email",
                label: "Email",
                kind: FormFieldKind::Email,
                required: true,
            },
            FormField {
                name: "status",
                label: "Status",
                kind: FormFieldKind::Choice(STATUSES),
                required: true,
            },
            FormField {
                name: "gpa",
                label: "GPA",
                kind: FormFieldKind::Number,
                required: false,
            },
        ]
    }

    fn data(pairs: &[(&str, &str)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_input_is_typed() {
        let values = validate_fields(
            &fields(),
            &data(&[
                ("name", " Ada "),
                ("email", "ada@uni.edu"),
                ("status", "Active"),
                ("gpa", "3.9"),
            ]),
        )
        .unwrap();

        assert_eq!(values["name"], FieldValue::from("Ada"));
        assert_eq!(values["gpa"], FieldValue::Number(3.9));
    }

    #[test]
    fn test_blank_optional_field_is_cleared() {
        let values = validate_fields(
            &fields(),
            &data(&[("name", "Ada"), ("email", "ada@uni.edu"), ("status", "Active"), ("gpa", " ")]),
        )
        .unwrap();
        assert!(values["gpa"].is_null());
    }

    #[test]
    fn test_all_missing_fields_are_collected() {
        let err = validate_fields(&fields(), &data(&[("name", "  ")])).unwrap_err();
        match err {
            AppError::Validation { fields } => {
                assert_eq!(
                    fields,
                    vec!["Full Name is required", "Email is required", "Status is required"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let err = validate_fields(
            &fields(),
            &data(&[
                ("name", "Ada"),
                ("email", "not-an-email"),
                ("status", "Expelled"),
                ("gpa", "high"),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref fields } if fields.len() == 3));
    }

    #[test]
    fn test_form_data_from_record() {
        let record = EntityRecord::new(1)
            .with("name", "Ada")
            .with("gpa", 3.5);
        let data = form_data_from_record(&fields(), &record);
        assert_eq!(data.get("name").map(String::as_str), Some("Ada"));
        assert_eq!(data.get("gpa").map(String::as_str), Some("3.5"));
        assert!(!data.contains_key("email"));
    }

    #[test]
    fn test_academic_year_options() {
        let mut medicine = DepartmentRecord::new("Medicine");
        medicine.total_years = Some(6);
        let departments = vec![medicine, DepartmentRecord::new("Physics")];

        assert_eq!(academic_year_options(&departments, "Medicine").len(), 6);
        assert_eq!(
            academic_year_options(&departments, "Physics"),
            vec!["Year 1", "Year 2", "Year 3", "Year 4"]
        );
        assert_eq!(academic_year_options(&departments, "Unknown").len(), 4);
    }

    #[test]
    fn test_department_options_skip_blank() {
        let departments = vec![
            DepartmentRecord::new("Physics"),
            DepartmentRecord::new(" "),
            DepartmentRecord::new("Math"),
        ];
        assert_eq!(department_options(&departments), vec!["Physics", "Math"]);
    }
}
