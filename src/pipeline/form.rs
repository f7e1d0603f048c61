// src/pipeline/form.rs

//! Add/edit form controller.
//!
//! ```text
//! Closed ──open_for_add / open_for_edit──▶ Open ──submit──▶ Submitting ──ok──▶ Closed
//!                                           ▲                   │
//!                                           └──────failed───────┘
//! ```

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{DepartmentRecord, EntityConfig, EntityRecord, EntityType, FormField};
use crate::pipeline::DashboardController;
use crate::services::forms::{self, FormData};
use crate::storage::EntityDataSource;

/// What the open form will do on submit.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Add,
    Edit(EntityRecord),
}

/// Lifecycle of the form popup.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Closed,
    Open(FormMode),
    Submitting(FormMode),
}

/// Controller for the add/edit record popup.
pub struct FormPopupController {
    source: Arc<dyn EntityDataSource>,
    entity_type: EntityType,
    entity_name: &'static str,
    fields: Vec<FormField>,
    state: FormState,
    data: FormData,
    departments: Vec<DepartmentRecord>,
    error: Option<String>,
}

impl FormPopupController {
    /// Create a closed form for an entity type.
    pub fn new(source: Arc<dyn EntityDataSource>, config: &EntityConfig) -> Self {
        Self {
            source,
            entity_type: config.entity_type,
            entity_name: config.entity_name,
            fields: config.form_fields.clone(),
            state: FormState::Closed,
            data: FormData::new(),
            departments: Vec::new(),
            error: None,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, FormState::Closed)
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// In-progress form input.
    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Last validation or submit error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Popup heading.
    pub fn title(&self) -> String {
        match &self.state {
            FormState::Open(FormMode::Edit(_)) | FormState::Submitting(FormMode::Edit(_)) => {
                format!("Edit {}", self.entity_name)
            }
            _ => format!("Add {}", self.entity_name),
        }
    }

    /// Open an empty form.
    pub async fn open_for_add(&mut self) {
        self.data.clear();
        self.open(FormMode::Add).await;
    }

    /// Open the form pre-filled from a record.
    pub async fn open_for_edit(&mut self, record: EntityRecord) {
        self.data = forms::form_data_from_record(&self.fields, &record);
        self.open(FormMode::Edit(record)).await;
    }

    async fn open(&mut self, mode: FormMode) {
        self.error = None;
        self.state = FormState::Open(mode);
        self.refresh_departments().await;
    }

    /// Reload the department list used by the department/year selects.
    pub async fn refresh_departments(&mut self) {
        self.departments = self.source.fetch_departments().await.unwrap_or_else(|e| {
            log::warn!("Failed to load departments for form: {e}");
            Vec::new()
        });
    }

    /// Update one in-progress field.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.data.insert(name.to_string(), value.into());
    }

    /// Department names for the department select.
    pub fn department_options(&self) -> Vec<String> {
        forms::department_options(&self.departments)
    }

    /// Academic years for the currently selected department.
    pub fn academic_year_options(&self) -> Vec<String> {
        let department = self.data.get("department").map(String::as_str).unwrap_or("");
        forms::academic_year_options(&self.departments, department)
    }

    /// Validate and submit, then reload the dashboard and close.
    ///
    /// The dashboard is only reloaded while it shows this form's entity type.
    ///
    /// On failure the form stays open with its input and mode intact.
    pub async fn submit(
        &mut self,
        form_data: FormData,
        dashboard: &mut DashboardController,
    ) -> Result<EntityRecord> {
        let mode = match &self.state {
            FormState::Open(mode) => mode.clone(),
            FormState::Closed => return Err(AppError::submit("form is not open")),
            FormState::Submitting(_) => return Err(AppError::submit("submit already in progress")),
        };
        self.data = form_data;

        let fields = match forms::validate_fields(&self.fields, &self.data) {
            Ok(fields) => fields,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.state = FormState::Submitting(mode.clone());
        self.error = None;

        let result = match &mode {
            FormMode::Add => self.source.create_record(self.entity_type, &fields).await,
            FormMode::Edit(record) if record.id > 0 => {
                self.source
                    .update_record(self.entity_type, record.id, &fields)
                    .await
            }
            FormMode::Edit(record) => Err(AppError::submit(format!(
                "cannot update a record without a valid id ({})",
                record.id
            ))),
        };

        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                let e = match e {
                    AppError::Submit(_) => e,
                    other => AppError::submit(other),
                };
                log::error!("Failed to save {}: {e}", self.entity_name);
                self.error = Some(e.to_string());
                self.state = FormState::Open(mode);
                return Err(e);
            }
        };

        log::info!("Saved {} {}", self.entity_name, saved.display_name());
        if dashboard.entity_type() == Some(self.entity_type) {
            if let Err(e) = dashboard.refresh().await {
                log::warn!("Dashboard reload after save failed: {e}");
            }
        } else {
            log::debug!(
                "Dashboard shows {:?}, skipping reload after saving {}",
                dashboard.entity_type(),
                self.entity_type
            );
        }
        self.close();
        Ok(saved)
    }

    /// Discard edits and close.
    pub fn cancel(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.state = FormState::Closed;
        self.data.clear();
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::models::FieldValue;
    use crate::services::ConfigRegistry;
    use crate::storage::MemoryDataSource;

    fn valid_student() -> FormData {
        [
            ("name", "Ada Lovelace"),
            ("email", "ada@uni.edu"),
            ("department", "Math"),
            ("academicYear", "Year 2"),
            ("status", "Active"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    async fn setup() -> (Arc<MemoryDataSource>, DashboardController, FormPopupController) {
        let source = Arc::new(MemoryDataSource::with_records(
            HashMap::from([(EntityType::Students, vec![EntityRecord::new(1).with("name", "Kim")])]),
            vec![DepartmentRecord::new("Math")],
        ));
        let mut dashboard = DashboardController::new(source.clone());
        dashboard.load("students").await.unwrap();

        let registry = ConfigRegistry::new();
        let form = FormPopupController::new(source.clone(), registry.config(EntityType::Students));
        (source, dashboard, form)
    }

    #[tokio::test]
    async fn test_add_submits_and_reloads() {
        let (_, mut dashboard, mut form) = setup().await;

        form.open_for_add().await;
        assert_eq!(form.title(), "Add Student");
        assert_eq!(form.department_options(), vec!["Math"]);

        let saved = form.submit(valid_student(), &mut dashboard).await.unwrap();
        assert_eq!(saved.id, 2);
        assert_eq!(form.state(), &FormState::Closed);
        assert_eq!(dashboard.view().records.len(), 2);
    }

    #[tokio::test]
    async fn test_edit_updates_record() {
        let (source, mut dashboard, mut form) = setup().await;

        let record = dashboard.view().records[0].clone();
        form.open_for_edit(record).await;
        assert_eq!(form.title(), "Edit Student");
        assert_eq!(form.data().get("name").map(String::as_str), Some("Kim"));

        form.submit(valid_student(), &mut dashboard).await.unwrap();
        let records = source.fetch_records(EntityType::Students).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text("name"), Some("Ada Lovelace"));
        assert_eq!(dashboard.view().records[0].text("name"), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_edit_can_clear_optional_field() {
        let (source, mut dashboard, mut form) = setup().await;
        let mut data = valid_student();
        data.insert("gpa".into(), "3.9".into());
        form.open_for_edit(dashboard.view().records[0].clone()).await;
        form.submit(data, &mut dashboard).await.unwrap();

        let record = dashboard.view().records[0].clone();
        assert_eq!(record.gpa, Some(FieldValue::Number(3.9)));

        form.open_for_edit(record).await;
        assert_eq!(form.data().get("gpa").map(String::as_str), Some("3.9"));
        form.set_field("gpa", "");
        let data = form.data().clone();
        form.submit(data, &mut dashboard).await.unwrap();

        let stored = source.fetch_records(EntityType::Students).await.unwrap();
        assert_eq!(stored[0].gpa, None);
        assert_eq!(stored[0].text("name"), Some("Ada Lovelace"));
        assert!(dashboard.view().records[0].get("gpa").is_none());
    }

    #[tokio::test]
    async fn test_submit_skips_reload_of_other_entity_type() {
        let (source, mut dashboard, mut form) = setup().await;
        dashboard.load("lecturers").await.unwrap();
        let loaded_at = dashboard.view().loaded_at;

        form.open_for_add().await;
        form.submit(valid_student(), &mut dashboard).await.unwrap();

        assert_eq!(dashboard.entity_type(), Some(EntityType::Lecturers));
        assert_eq!(dashboard.view().loaded_at, loaded_at);
        assert_eq!(source.fetch_records(EntityType::Students).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_validation_failure_keeps_form_open() {
        let (source, mut dashboard, mut form) = setup().await;
        form.open_for_add().await;

        let mut data = valid_student();
        data.insert("email".into(), " ".into());
        let err = form.submit(data, &mut dashboard).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(form.state(), &FormState::Open(FormMode::Add));
        assert!(form.error().is_some());
        assert_eq!(form.data().get("name").map(String::as_str), Some("Ada Lovelace"));
        assert_eq!(source.fetch_records(EntityType::Students).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_mode() {
        let (source, mut dashboard, mut form) = setup().await;
        let record = dashboard.view().records[0].clone();
        form.open_for_edit(record.clone()).await;

        source.fail_writes(true);
        let err = form.submit(valid_student(), &mut dashboard).await.unwrap_err();
        assert!(matches!(err, AppError::Submit(_)));
        assert_eq!(form.state(), &FormState::Open(FormMode::Edit(record)));

        source.fail_writes(false);
        assert!(form.submit(valid_student(), &mut dashboard).await.is_ok());
        assert!(!form.is_open());
    }

    #[tokio::test]
    async fn test_department_failure_degrades_to_empty() {
        let (source, _, mut form) = setup().await;
        source.fail_departments(true);
        form.open_for_add().await;
        assert!(form.is_open());
        assert!(form.department_options().is_empty());
        assert_eq!(form.academic_year_options().len(), 4);
    }

    #[tokio::test]
    async fn test_cancel_clears_state() {
        let (_, mut dashboard, mut form) = setup().await;
        form.open_for_add().await;
        form.set_field("name", "Draft");
        let _ = form.submit(FormData::new(), &mut dashboard).await;
        assert!(form.error().is_some());

        form.cancel();
        assert_eq!(form.state(), &FormState::Closed);
        assert!(form.error().is_none());
        assert!(form.data().is_empty());
    }

    #[tokio::test]
    async fn test_submit_when_closed() {
        let (_, mut dashboard, mut form) = setup().await;
        assert!(form.submit(valid_student(), &mut dashboard).await.is_err());
    }
}
