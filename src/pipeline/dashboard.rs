// src/pipeline/dashboard.rs

//! Dashboard controller: fetch → filter → stats → cards.
//!
//! ## States
//!
//! ```text
//! Idle ──load──▶ Loading ──ok──▶ Ready ──refresh──▶ Loading
//!                   │
//!                   └──records failed──▶ Error ──retry──▶ Loading
//! ```
//!
//! Every load is tagged with a `LoadTicket`. Only the outcome carrying the
//! most recently issued ticket is applied, so a slow response can never
//! overwrite a newer one.

use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::models::{
    ALL_OPTION, CardAction, CardStyles, CardViewModel, DashboardState, DashboardView,
    DepartmentRecord, EntityConfig, EntityRecord, EntityType, FilterValue, ProfileRoute,
};
use crate::services::{ConfigRegistry, compute_stats, filters};
use crate::storage::EntityDataSource;

/// Identifies one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    entity_type: EntityType,
}

impl LoadTicket {
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }
}

/// Joined result of the record and department fetches.
#[derive(Debug)]
pub struct LoadOutcome {
    pub records: Result<Vec<EntityRecord>>,
    pub departments: Result<Vec<DepartmentRecord>>,
}

/// Fetch records and departments concurrently.
pub async fn fetch_snapshot(
    source: &dyn EntityDataSource,
    entity_type: EntityType,
) -> LoadOutcome {
    let (records, departments) = futures::join!(
        source.fetch_records(entity_type),
        source.fetch_departments()
    );
    LoadOutcome {
        records,
        departments,
    }
}

/// Orchestrates the dashboard for one entity type at a time.
pub struct DashboardController {
    source: Arc<dyn EntityDataSource>,
    registry: Arc<ConfigRegistry>,
    styles: CardStyles,
    entity_type: Option<EntityType>,
    state: DashboardState,
    view: DashboardView,
    latest_seq: u64,
}

impl DashboardController {
    /// Create a controller with the built-in registry and default card styles.
    pub fn new(source: Arc<dyn EntityDataSource>) -> Self {
        Self::with_registry(source, Arc::new(ConfigRegistry::new()), CardStyles::default())
    }

    /// Create a controller with explicit registry and card styles.
    pub fn with_registry(
        source: Arc<dyn EntityDataSource>,
        registry: Arc<ConfigRegistry>,
        styles: CardStyles,
    ) -> Self {
        Self {
            source,
            registry,
            styles,
            entity_type: None,
            state: DashboardState::Idle,
            view: DashboardView::default(),
            latest_seq: 0,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn entity_type(&self) -> Option<EntityType> {
        self.entity_type
    }

    /// Configuration of the active entity type.
    pub fn config(&self) -> Option<&EntityConfig> {
        self.entity_type.map(|ty| self.registry.config(ty))
    }

    /// Load an entity type, replacing the view if the type changes.
    pub async fn load(&mut self, entity_type: &str) -> Result<()> {
        let ticket = self.begin_load(entity_type)?;
        let outcome = fetch_snapshot(self.source.as_ref(), ticket.entity_type).await;
        self.finish_load(ticket, outcome);
        Ok(())
    }

    /// Reload the active entity type. No-op when nothing is loaded yet.
    pub async fn refresh(&mut self) -> Result<()> {
        let Some(entity_type) = self.entity_type else {
            log::warn!("Refresh requested before any entity type was loaded");
            return Ok(());
        };
        self.load(entity_type.as_str()).await
    }

    /// Retry after a failed load.
    pub async fn retry(&mut self) -> Result<()> {
        if !matches!(self.state, DashboardState::Error(_)) {
            log::debug!("Retry requested in state {:?}", self.state);
        }
        self.refresh().await
    }

    /// Start a load and return its ticket.
    ///
    /// Unknown entity types are rejected before any state changes.
    pub fn begin_load(&mut self, entity_type: &str) -> Result<LoadTicket> {
        let ty = self.registry.get(entity_type)?.entity_type;

        if self.entity_type != Some(ty) {
            log::info!("Switching dashboard to {ty}");
            self.entity_type = Some(ty);
            self.view = self.fresh_view(ty);
        }

        self.latest_seq += 1;
        self.state = DashboardState::Loading;
        self.view.loading = true;
        self.view.error = None;

        Ok(LoadTicket {
            seq: self.latest_seq,
            entity_type: ty,
        })
    }

    /// Apply a load outcome. Returns `false` when the ticket is stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: LoadOutcome) -> bool {
        if ticket.seq != self.latest_seq || Some(ticket.entity_type) != self.entity_type {
            log::debug!(
                "Discarding stale {} load #{} (latest #{})",
                ticket.entity_type,
                ticket.seq,
                self.latest_seq
            );
            return false;
        }

        match outcome.records {
            Ok(records) => {
                let departments = outcome.departments.unwrap_or_else(|e| {
                    log::warn!("Department fetch failed, continuing without departments: {e}");
                    Vec::new()
                });
                log::info!(
                    "Loaded {} {} and {} departments",
                    records.len(),
                    ticket.entity_type,
                    departments.len()
                );

                self.view.records = records;
                self.view.departments = departments;
                self.view.loaded_at = Some(Utc::now());
                self.view.error = None;
                self.state = DashboardState::Ready;
                self.revalidate_primary();
            }
            Err(e) => {
                let message = e.to_string();
                log::error!("Failed to load {}: {message}", ticket.entity_type);

                self.view.records.clear();
                self.view.departments.clear();
                self.view.error = Some(message.clone());
                self.state = DashboardState::Error(message);
            }
        }

        self.view.loading = false;
        self.recompute();
        true
    }

    /// Refetch only the department list.
    pub async fn refresh_departments(&mut self) {
        self.view.departments = self.source.fetch_departments().await.unwrap_or_else(|e| {
            log::warn!("Department refresh failed: {e}");
            Vec::new()
        });
        self.recompute();
    }

    /// Primary options for the active records (`All` first).
    pub fn primary_options(&self) -> Vec<String> {
        match self.config() {
            Some(config) => {
                filters::primary_options(&self.view.records, config.primary_filter_field)
            }
            None => vec![ALL_OPTION.to_string()],
        }
    }

    /// Sorted options for a secondary filter.
    pub fn filter_options(&self, name: &str) -> Vec<String> {
        filters::filter_options(name, &self.view.records)
    }

    /// Select a primary value. Values not present in the records are rejected.
    pub fn set_primary_filter(&mut self, value: &str) -> bool {
        let Some(field) = self.config().map(|c| c.primary_filter_field) else {
            log::warn!("Primary filter set before any entity type was loaded");
            return false;
        };

        let selection = FilterValue::parse(value);
        if let Some(v) = selection.value() {
            if !filters::has_primary_value(&self.view.records, field, v) {
                log::warn!("Ignoring primary filter '{v}': not present in {field}");
                return false;
            }
        }

        self.view.primary_filter = selection;
        self.recompute();
        true
    }

    /// Set a secondary filter value (`all` clears it).
    pub fn set_secondary_filter(&mut self, name: &str, value: &str) -> bool {
        if !self.is_secondary_filter(name) {
            return false;
        }
        self.view
            .secondary_filters
            .insert(name.to_string(), FilterValue::parse(value));
        self.recompute();
        true
    }

    /// Button-style selection: choosing the active value clears the filter.
    pub fn toggle_secondary_filter(&mut self, name: &str, value: &str) -> bool {
        if !self.is_secondary_filter(name) {
            return false;
        }

        let selection = FilterValue::parse(value);
        let current = self.view.secondary_filters.get(name);
        let next = if current == Some(&selection) {
            FilterValue::All
        } else {
            selection
        };

        self.view.secondary_filters.insert(name.to_string(), next);
        self.recompute();
        true
    }

    /// Clear primary and secondary filters.
    pub fn reset_filters(&mut self) {
        self.view.primary_filter = FilterValue::All;
        for value in self.view.secondary_filters.values_mut() {
            *value = FilterValue::All;
        }
        self.recompute();
    }

    /// Run the filter action bound to a card.
    ///
    /// Returns `false` for unknown ids and for filter targets the active
    /// config does not declare.
    pub fn card_click(&mut self, card_id: &str) -> bool {
        let Some(action) = self
            .config()
            .and_then(|c| c.card(card_id))
            .map(|card| card.action.clone())
        else {
            log::info!("Ignoring click on unknown card '{card_id}'");
            return false;
        };

        match action {
            CardAction::ResetFilters => {
                self.reset_filters();
                true
            }
            CardAction::SetFilter { field, value } => self.set_secondary_filter(field, value),
            CardAction::None => {
                log::debug!("Card '{card_id}' has no action");
                true
            }
        }
    }

    /// Route to a record's profile if it belongs to the loaded records.
    pub fn go_to_profile(&self, record: &EntityRecord) -> Option<ProfileRoute> {
        let entity_type = self.entity_type?;

        if record.id <= 0 {
            log::warn!(
                "Cannot open profile for {}: invalid id {}",
                record.display_name(),
                record.id
            );
            return None;
        }
        if !self.view.records.iter().any(|r| r.id == record.id) {
            log::warn!("Cannot open profile: {entity_type} record {} is not loaded", record.id);
            return None;
        }

        let route = ProfileRoute {
            entity_type,
            id: record.id,
        };
        log::debug!("Navigating to {}", route.path());
        Some(route)
    }

    fn is_secondary_filter(&self, name: &str) -> bool {
        let known = self
            .config()
            .is_some_and(|c| c.secondary_filter(name).is_some());
        if !known {
            log::warn!("Ignoring unknown secondary filter '{name}'");
        }
        known
    }

    fn fresh_view(&self, entity_type: EntityType) -> DashboardView {
        let config = self.registry.config(entity_type);
        let mut view = DashboardView::default();
        for filter in &config.secondary_filters {
            view.secondary_filters
                .insert(filter.name.to_string(), FilterValue::All);
        }
        view
    }

    /// Drop a primary selection that no longer exists after a refresh.
    fn revalidate_primary(&mut self) {
        let Some(field) = self.config().map(|c| c.primary_filter_field) else {
            return;
        };
        if let Some(value) = self.view.primary_filter.value() {
            if !filters::has_primary_value(&self.view.records, field, value) {
                log::info!("Primary filter '{value}' no longer present, resetting to All");
                self.view.primary_filter = FilterValue::All;
            }
        }
    }

    /// Recompute filtered records, then stats, then cards.
    fn recompute(&mut self) {
        let Some(entity_type) = self.entity_type else {
            return;
        };
        let registry = Arc::clone(&self.registry);
        let config = registry.config(entity_type);
        let view = &mut self.view;

        view.filtered = filters::apply(
            &view.records,
            config.primary_filter_field,
            &view.primary_filter,
            &view.secondary_filters,
        );
        view.stats = compute_stats(&config.stats, &view.filtered, &view.departments);
        view.cards = config
            .cards
            .iter()
            .map(|card| {
                let (icon, gradient) = self.styles.resolve(card.id);
                CardViewModel {
                    id: card.id.to_string(),
                    title: card.title.to_string(),
                    stat_key: card.stat_key.to_string(),
                    icon: icon.to_string(),
                    gradient: gradient.to_string(),
                    value: view
                        .stats
                        .get(card.stat_key)
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                }
            })
            .collect();
    }
}
