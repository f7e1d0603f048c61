// src/models/mod.rs

//! Domain models for the dashboard pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

pub mod config;
mod entity;
mod record;
mod view;

// Re-export all public types
pub use config::{ApiConfig, CardStyle, Config, DashboardConfig, LoggingConfig};
pub use entity::{
    CardAction, CardDefinition, EntityConfig, EntityType, FilterDefinition, FilterKind, FormField,
    FormFieldKind, Resolution, StatDefinition, StatFn, StatValue,
};
pub use record::{DepartmentRecord, EntityRecord, FieldMap, FieldValue};
pub use view::{
    ALL_OPTION, CardStyles, CardViewModel, DashboardState, DashboardView, FilterValue,
    ProfileRoute, SecondaryFilters, StatsMap,
};
