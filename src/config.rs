// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading configuration
//! and picking the data source the controllers talk to.

use std::path::Path;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::storage::{EntityDataSource, HttpDataSource, MemoryDataSource};

/// Load configuration from a TOML file.
///
/// Falls back to defaults if loading fails.
pub fn load_config(path: &Path) -> Config {
    Config::load_or_default(path)
}

/// Load and validate configuration.
pub fn load_validated(path: &Path) -> Result<Config> {
    let config = Config::load(path)?;
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid config {}: {e}", path.display())))?;
    Ok(config)
}

/// Open the data source: a JSON fixture when given, otherwise the REST API.
pub async fn open_source(
    config: &Config,
    fixture: Option<&Path>,
) -> Result<Arc<dyn EntityDataSource>> {
    match fixture {
        Some(path) => {
            let source = MemoryDataSource::load(path).await?;
            Ok(Arc::new(source))
        }
        None => {
            log::info!("Using REST API at {}", config.api.base_url);
            Ok(Arc::new(HttpDataSource::new(&config.api)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityType;
    use tempfile::TempDir;

    #[test]
    fn test_load_validated_rejects_bad_url() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"not a url\"\n").unwrap();

        assert!(matches!(load_validated(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_config_falls_back() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("missing.toml"));
        assert_eq!(config.dashboard.default_entity, "students");
    }

    #[tokio::test]
    async fn test_open_fixture_source() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fixture.json");
        std::fs::write(&path, r#"{"students": [{"id": 1}]}"#).unwrap();

        let source = open_source(&Config::default(), Some(&path)).await.unwrap();
        let records = source.fetch_records(EntityType::Students).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_bundled_sample_fixture() {
        use crate::models::StatValue;
        use crate::pipeline::DashboardController;

        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let config = load_validated(&root.join("data/config.toml")).unwrap();
        let source = open_source(&config, Some(&root.join("data/sample.json")))
            .await
            .unwrap();

        let mut dashboard = DashboardController::new(source);
        dashboard.load("students").await.unwrap();
        let stats = &dashboard.view().stats;
        assert_eq!(stats["totalStudents"], StatValue::Count(4));
        assert_eq!(stats["activeStudents"], StatValue::Count(2));
        assert_eq!(stats["topPerformers"], StatValue::Count(2));

        dashboard.load("lecturers").await.unwrap();
        let stats = &dashboard.view().stats;
        assert_eq!(stats["totalDepartments"], StatValue::Count(3));
        assert_eq!(stats["fullTimeLecturers"], StatValue::Count(2));
    }
}
