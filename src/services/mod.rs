//! Service layer for the dashboard pipeline.
//!
//! This module contains the business logic for:
//! - Entity configuration lookup (`ConfigRegistry`)
//! - Stat calculation (`compute_stats`)
//! - Record filtering and option lists (`filters`)
//! - Form validation and option lists (`forms`)

pub mod filters;
pub mod forms;
mod registry;
pub mod stats;

pub use registry::ConfigRegistry;
pub use stats::compute_stats;
