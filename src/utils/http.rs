// src/utils/http.rs

//! HTTP client for the portal REST API.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::error::Result;
use crate::models::ApiConfig;

/// Build the JSON client shared by every request of an `HttpDataSource`.
pub fn create_async_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .gzip(true)
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}
