// src/models/view.rs

//! Derived dashboard view-state handed to the presentation layer.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::models::{CardStyle, DepartmentRecord, EntityRecord, EntityType, StatValue};

/// Label of the catch-all primary option.
pub const ALL_OPTION: &str = "All";

/// A filter selection: everything, or one concrete value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterValue {
    #[default]
    All,
    Is(String),
}

impl FilterValue {
    /// Parse a UI value. Blank input and `all` (any case) mean no filter.
    pub fn parse(value: &str) -> Self {
        if value.trim().is_empty() || value.trim().eq_ignore_ascii_case("all") {
            FilterValue::All
        } else {
            FilterValue::Is(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            FilterValue::All => None,
            FilterValue::Is(v) => Some(v),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::All => f.write_str("all"),
            FilterValue::Is(v) => f.write_str(v),
        }
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Secondary filter selections keyed by field.
pub type SecondaryFilters = BTreeMap<String, FilterValue>;

/// Computed stats keyed by stat name.
pub type StatsMap = BTreeMap<String, StatValue>;

/// Display-ready card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardViewModel {
    pub id: String,
    pub title: String,
    pub stat_key: String,
    pub icon: String,
    pub gradient: String,
    pub value: String,
}

/// Icon and gradient lookup keyed by card id.
#[derive(Debug, Clone)]
pub struct CardStyles {
    styles: HashMap<String, (String, String)>,
}

impl CardStyles {
    const DEFAULT_ICON: &'static str = "chart";
    const DEFAULT_GRADIENT: &'static str = "from-slate-500 to-slate-700";

    pub fn new(styles: &[CardStyle]) -> Self {
        Self {
            styles: styles
                .iter()
                .map(|s| (s.card_id.clone(), (s.icon.clone(), s.gradient.clone())))
                .collect(),
        }
    }

    /// Resolve `(icon, gradient)` for a card, falling back to a neutral style.
    pub fn resolve(&self, card_id: &str) -> (&str, &str) {
        self.styles
            .get(card_id)
            .map(|(icon, gradient)| (icon.as_str(), gradient.as_str()))
            .unwrap_or((Self::DEFAULT_ICON, Self::DEFAULT_GRADIENT))
    }
}

impl Default for CardStyles {
    fn default() -> Self {
        Self::new(&crate::models::config::default_card_styles())
    }
}

/// Lifecycle of the dashboard controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum DashboardState {
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Derived view-state for one entity type.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub records: Vec<EntityRecord>,
    pub departments: Vec<DepartmentRecord>,
    pub filtered: Vec<EntityRecord>,
    pub primary_filter: FilterValue,
    pub secondary_filters: SecondaryFilters,
    pub stats: StatsMap,
    pub cards: Vec<CardViewModel>,
    pub loading: bool,
    pub error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Navigation request for a record's profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRoute {
    pub entity_type: EntityType,
    pub id: i64,
}

impl ProfileRoute {
    /// Path the router should navigate to.
    pub fn path(&self) -> String {
        format!("/{}/{}", self.entity_type, self.id)
    }
}
