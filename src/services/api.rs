// src/services/api.rs

//! Remote endpoints behind two small traits.
//!
//! The polling loop only sees [`CatalogSource`] and [`DetailSource`], so the
//! network can be swapped for fakes in tests.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, CatalogEntry, CatalogResponse};
use crate::utils::http;

/// Raw detail response, before any validation.
#[derive(Debug, Clone)]
pub struct DetailResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

#[cfg(test)]
impl DetailResponse {
    /// A 200 response with a JSON content type.
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: body.into(),
        }
    }
}

/// Source of the full candidate list.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>>;
}

/// Source of per-id detail responses.
///
/// Implementations must not apply their own timeout; the classifier bounds
/// each attempt.
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch_detail(&self, id: u64) -> Result<DetailResponse>;
}

/// HTTP implementation of both sources.
pub struct StoreApi {
    client: Client,
    config: ApiConfig,
}

impl StoreApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = http::create_async_client(&config)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl CatalogSource for StoreApi {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let url = &self.config.catalog_url;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::catalog(url, format!("HTTP {status}")));
        }

        let text = response.text().await?;
        let parsed: CatalogResponse =
            serde_json::from_str(&text).map_err(|e| AppError::catalog(url, e))?;
        Ok(parsed.into_entries())
    }
}

#[async_trait]
impl DetailSource for StoreApi {
    async fn fetch_detail(&self, id: u64) -> Result<DetailResponse> {
        let url = http::detail_url(&self.config.detail_url, &self.config.detail_id_param, id)?;
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        let content_type = http::content_type(response.headers());
        let body = response.text().await?;

        Ok(DetailResponse {
            status,
            content_type,
            body,
        })
    }
}
