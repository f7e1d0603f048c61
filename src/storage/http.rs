//! REST-backed data source.
//!
//! ## Endpoints
//!
//! ```text
//! GET  {base}/{entity}        → [record, ...]
//! GET  {base}/departments     → [department, ...]
//! POST {base}/{entity}        → record
//! PUT  {base}/{entity}/{id}   → record
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, DepartmentRecord, EntityRecord, EntityType, FieldMap};
use crate::storage::{EntityDataSource, decode_list};
use crate::utils::{endpoint, http::create_async_client};

/// Data source talking to the portal REST API.
#[derive(Clone)]
pub struct HttpDataSource {
    client: Client,
    base_url: Url,
}

impl HttpDataSource {
    /// Create a data source from API settings.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            base_url: Url::parse(&config.base_url)?,
        })
    }

    /// Create a data source with an existing client.
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    async fn get_list(&self, path: &str) -> Result<serde_json::Value> {
        let url = endpoint(&self.base_url, path)?;
        log::debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(path, format!("server responded {status}")));
        }
        Ok(response.json().await?)
    }

    async fn read_record(response: Response) -> Result<EntityRecord> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = body.trim();
            return Err(if message.is_empty() {
                AppError::submit(format!("server responded {status}"))
            } else {
                AppError::submit(format!("server responded {status}: {message}"))
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl EntityDataSource for HttpDataSource {
    async fn fetch_records(&self, entity_type: EntityType) -> Result<Vec<EntityRecord>> {
        let payload = self.get_list(entity_type.as_str()).await?;
        Ok(decode_list(payload, entity_type.as_str()))
    }

    async fn fetch_departments(&self) -> Result<Vec<DepartmentRecord>> {
        let payload = self.get_list("departments").await?;
        Ok(decode_list(payload, "departments"))
    }

    async fn create_record(
        &self,
        entity_type: EntityType,
        fields: &FieldMap,
    ) -> Result<EntityRecord> {
        let url = endpoint(&self.base_url, entity_type.as_str())?;
        log::debug!("POST {url}");

        let response = self.client.post(url).json(fields).send().await?;
        Self::read_record(response).await
    }

    async fn update_record(
        &self,
        entity_type: EntityType,
        id: i64,
        fields: &FieldMap,
    ) -> Result<EntityRecord> {
        let url = endpoint(&self.base_url, &format!("{}/{id}", entity_type.as_str()))?;
        log::debug!("PUT {url}");

        let response = self.client.put(url).json(fields).send().await?;
        Self::read_record(response).await
    }
}
