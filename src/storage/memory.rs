//! In-memory data source.
//!
//! Backs the CLI's `--fixture` mode and the controller tests. Records live
//! behind a `tokio::sync::RwLock`; a fixture file can seed them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::models::{DepartmentRecord, EntityRecord, EntityType, FieldMap};
use crate::storage::{EntityDataSource, decode_list};

/// JSON fixture with records per entity type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub students: serde_json::Value,
    #[serde(default)]
    pub lecturers: serde_json::Value,
    #[serde(default)]
    pub departments: serde_json::Value,
}

/// Data source holding records in memory.
#[derive(Default)]
pub struct MemoryDataSource {
    records: RwLock<HashMap<EntityType, Vec<EntityRecord>>>,
    departments: RwLock<Vec<DepartmentRecord>>,
    fail_records: AtomicBool,
    fail_departments: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryDataSource {
    /// Create an empty data source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a data source seeded with records.
    pub fn with_records(
        records: HashMap<EntityType, Vec<EntityRecord>>,
        departments: Vec<DepartmentRecord>,
    ) -> Self {
        Self {
            records: RwLock::new(records),
            departments: RwLock::new(departments),
            ..Self::default()
        }
    }

    /// Build from a parsed fixture.
    pub fn from_fixture(fixture: Fixture) -> Self {
        let records = HashMap::from([
            (
                EntityType::Students,
                decode_list(fixture.students, EntityType::Students.as_str()),
            ),
            (
                EntityType::Lecturers,
                decode_list(fixture.lecturers, EntityType::Lecturers.as_str()),
            ),
        ]);
        Self::with_records(records, decode_list(fixture.departments, "departments"))
    }

    /// Load a JSON fixture file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let fixture: Fixture = serde_json::from_slice(&bytes)?;
        log::info!("Loaded fixture from {}", path.as_ref().display());
        Ok(Self::from_fixture(fixture))
    }

    /// Snapshot the current records and departments as a fixture.
    pub async fn to_fixture(&self) -> Result<Fixture> {
        let records = self.records.read().await;
        let list = |ty: EntityType| {
            let slice = records.get(&ty).map_or(&[][..], Vec::as_slice);
            serde_json::to_value(slice)
        };
        Ok(Fixture {
            students: list(EntityType::Students)?,
            lecturers: list(EntityType::Lecturers)?,
            departments: serde_json::to_value(&*self.departments.read().await)?,
        })
    }

    /// Write the current state back to a fixture file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let fixture = self.to_fixture().await?;
        let bytes = serde_json::to_vec_pretty(&fixture)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    /// Make record fetches fail.
    pub fn fail_records(&self, fail: bool) {
        self.fail_records.store(fail, Ordering::SeqCst);
    }

    /// Make department fetches fail.
    pub fn fail_departments(&self, fail: bool) {
        self.fail_departments.store(fail, Ordering::SeqCst);
    }

    /// Make create/update fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::submit("data source rejected the write"));
        }
        Ok(())
    }
}

#[async_trait]
impl EntityDataSource for MemoryDataSource {
    async fn fetch_records(&self, entity_type: EntityType) -> Result<Vec<EntityRecord>> {
        if self.fail_records.load(Ordering::SeqCst) {
            return Err(AppError::fetch(entity_type.as_str(), "data source unavailable"));
        }
        let records = self.records.read().await;
        Ok(records.get(&entity_type).cloned().unwrap_or_default())
    }

    async fn fetch_departments(&self) -> Result<Vec<DepartmentRecord>> {
        if self.fail_departments.load(Ordering::SeqCst) {
            return Err(AppError::fetch("departments", "data source unavailable"));
        }
        Ok(self.departments.read().await.clone())
    }

    async fn create_record(
        &self,
        entity_type: EntityType,
        fields: &FieldMap,
    ) -> Result<EntityRecord> {
        self.check_writes()?;

        let mut records = self.records.write().await;
        let list = records.entry(entity_type).or_default();
        let next_id = list.iter().map(|r| r.id).max().unwrap_or(0).max(0) + 1;

        let mut record = EntityRecord::new(next_id);
        record.apply_fields(fields);
        list.push(record.clone());

        log::debug!("Created {entity_type} record {next_id}");
        Ok(record)
    }

    async fn update_record(
        &self,
        entity_type: EntityType,
        id: i64,
        fields: &FieldMap,
    ) -> Result<EntityRecord> {
        self.check_writes()?;

        let mut records = self.records.write().await;
        let record = records
            .get_mut(&entity_type)
            .and_then(|list| list.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| AppError::NotFound {
                entity: entity_type.to_string(),
                id,
            })?;

        record.apply_fields(fields);
        log::debug!("Updated {entity_type} record {id}");
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;
    use tempfile::TempDir;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::from(*v)))
            .collect()
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let source = MemoryDataSource::with_records(
            HashMap::from([(EntityType::Students, vec![EntityRecord::new(4)])]),
            vec![],
        );

        let created = source
            .create_record(EntityType::Students, &fields(&[("name", "Ada")]))
            .await
            .unwrap();
        assert_eq!(created.id, 5);
        assert_eq!(source.fetch_records(EntityType::Students).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let source = MemoryDataSource::new();
        let err = source
            .update_record(EntityType::Lecturers, 9, &fields(&[("name", "X")]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { id: 9, .. }));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let source = MemoryDataSource::new();
        source.fail_departments(true);
        assert!(source.fetch_departments().await.is_err());
        assert!(source.fetch_records(EntityType::Students).await.is_ok());

        source.fail_writes(true);
        assert!(matches!(
            source.create_record(EntityType::Students, &FieldMap::new()).await,
            Err(AppError::Submit(_))
        ));
    }

    #[tokio::test]
    async fn test_fixture_save_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fixture.json");
        tokio::fs::write(
            &path,
            r#"{"students": [{"id": 1, "name": "Kim"}], "lecturers": "oops", "departments": [{"name": "Physics"}]}"#,
        )
        .await
        .unwrap();

        let source = MemoryDataSource::load(&path).await.unwrap();
        assert_eq!(source.fetch_records(EntityType::Students).await.unwrap().len(), 1);
        assert!(source.fetch_records(EntityType::Lecturers).await.unwrap().is_empty());

        source
            .create_record(EntityType::Lecturers, &fields(&[("name", "Lee")]))
            .await
            .unwrap();
        source.save(&path).await.unwrap();

        let reloaded = MemoryDataSource::load(&path).await.unwrap();
        let lecturers = reloaded.fetch_records(EntityType::Lecturers).await.unwrap();
        assert_eq!(lecturers[0].text("name"), Some("Lee"));
        assert_eq!(reloaded.fetch_departments().await.unwrap()[0].name, "Physics");
    }
}
