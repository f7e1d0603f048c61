//! Controllers driving the dashboard and its add/edit form.
//!
//! - `DashboardController`: fetch, filter, stats and cards for one entity type
//! - `FormPopupController`: create/update a record, then reload the dashboard

pub mod dashboard;
pub mod form;

pub use dashboard::{DashboardController, LoadOutcome, LoadTicket, fetch_snapshot};
pub use form::{FormMode, FormPopupController, FormState};
