// src/models/record.rs

//! Entity and department records as returned by the data source.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Field name → value map used for create/update payloads.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// A single field value on a record.
///
/// Scalars are kept as-is; anything else (arrays, objects, null inside the
/// extension map) is carried opaquely in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Other(serde_json::Value),
}

impl FieldValue {
    /// Explicit null, used to clear a field on update.
    pub fn null() -> Self {
        FieldValue::Other(serde_json::Value::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Other(serde_json::Value::Null))
    }

    /// Borrow the value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value carries no usable content.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(n) => !n.is_finite(),
            FieldValue::Bool(_) => false,
            FieldValue::Other(v) => v.is_null(),
        }
    }

    /// String form used for filter matching and option lists.
    ///
    /// Text is returned untouched; numbers use their shortest form
    /// (`2.0` → `"2"`). Opaque values have no key.
    pub fn filter_key(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) if n.is_finite() => Some(format_number(*n)),
            FieldValue::Number(_) => None,
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Other(_) => None,
        }
    }

    /// Coerce to a number.
    ///
    /// Blank or unparseable text and null count as `0`. Booleans and
    /// structured values are malformed and return an error message.
    pub fn to_number(&self) -> std::result::Result<f64, String> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Ok(*n),
            FieldValue::Number(_) => Ok(0.0),
            FieldValue::Text(s) => Ok(s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0)),
            FieldValue::Other(v) if v.is_null() => Ok(0.0),
            FieldValue::Bool(b) => Err(format!("expected a number, found boolean {b}")),
            FieldValue::Other(v) => Err(format!("expected a number, found {v}")),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => f.write_str(&format_number(*n)),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Other(v) if v.is_null() => Ok(()),
            FieldValue::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A student or lecturer record.
///
/// Well-known fields are explicit; everything else lands in `extra` so
/// unknown attributes survive a round trip through the data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    /// Record identifier (positive for persisted records)
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<FieldValue>,

    /// Any other attribute sent by the backend
    #[serde(flatten)]
    pub extra: BTreeMap<String, FieldValue>,
}

impl EntityRecord {
    /// Create an empty record with the given id.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Builder-style field assignment.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.set(field, value.into());
        self
    }

    /// Look up a field by its wire name (`academicYear`, `employmentType`, ...).
    ///
    /// Null values are reported as absent.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        let value = match field {
            "name" => self.name.as_ref(),
            "email" => self.email.as_ref(),
            "status" => self.status.as_ref(),
            "department" => self.department.as_ref(),
            "academicYear" => self.academic_year.as_ref(),
            "gpa" => self.gpa.as_ref(),
            "rating" => self.rating.as_ref(),
            "specialization" => self.specialization.as_ref(),
            "employmentType" => self.employment_type.as_ref(),
            "experience" => self.experience.as_ref(),
            other => self.extra.get(other),
        };
        value.filter(|v| !v.is_null())
    }

    /// Assign a field by its wire name. `id` is not settable here.
    ///
    /// A null value clears the field.
    pub fn set(&mut self, field: &str, value: FieldValue) {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "status" => &mut self.status,
            "department" => &mut self.department,
            "academicYear" => &mut self.academic_year,
            "gpa" => &mut self.gpa,
            "rating" => &mut self.rating,
            "specialization" => &mut self.specialization,
            "employmentType" => &mut self.employment_type,
            "experience" => &mut self.experience,
            "id" => return,
            other => {
                if value.is_null() {
                    self.extra.remove(other);
                } else {
                    self.extra.insert(other.to_string(), value);
                }
                return;
            }
        };
        *slot = (!value.is_null()).then_some(value);
    }

    /// Apply every entry of a field map.
    pub fn apply_fields(&mut self, fields: &FieldMap) {
        for (key, value) in fields {
            self.set(key, value.clone());
        }
    }

    /// Text value of a field, if it is text.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Numeric value of a field; missing counts as `0`.
    pub fn numeric(&self, field: &str) -> std::result::Result<f64, String> {
        self.get(field).map_or(Ok(0.0), FieldValue::to_number)
    }

    /// Display name used in logs.
    pub fn display_name(&self) -> String {
        self.get("name")
            .map(|v| v.to_string())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("#{}", self.id))
    }
}

/// Accept ids sent as numbers or numeric strings; anything else becomes 0.
fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// A department as listed by the data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Number of academic years offered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_years: Option<u32>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DepartmentRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
