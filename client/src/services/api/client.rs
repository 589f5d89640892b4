//! # API Client
//!
//! Shared HTTP client for the auth and catalog services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{LoginRequest, Product, RegisterRequest};

use crate::config::ClientConfig;
use crate::core::error::ApiError;
use crate::core::service::{AuthService, CatalogService};

/// HTTP client for the two backing services.
///
/// The auth API and the catalog API live on different hosts in the default
/// deployment, so each gets its own base URL while sharing one connection
/// pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    auth_base_url: String,
    catalog_base_url: String,
}

impl ApiClient {
    /// Create a client from configuration.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_base_urls(&config.auth_base_url, &config.catalog_base_url, config.request_timeout)
    }

    /// Create a client against explicit base URLs.
    ///
    /// Trailing slashes are trimmed so endpoint paths can always be appended.
    pub fn with_base_urls(auth_base_url: &str, catalog_base_url: &str, timeout: Duration) -> Self {
        // Every request is bounded; a hung call would otherwise never settle
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            });

        Self {
            client,
            auth_base_url: auth_base_url.trim_end_matches('/').to_string(),
            catalog_base_url: catalog_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}{}", self.auth_base_url, path)
    }

    pub(crate) fn catalog_url(&self, path: &str) -> String {
        format!("{}{}", self.catalog_base_url, path)
    }
}

#[async_trait]
impl AuthService for ApiClient {
    async fn login(&self, request: LoginRequest) -> Result<(), ApiError> {
        super::auth::login(self, request).await
    }

    async fn register(&self, request: RegisterRequest) -> Result<(), ApiError> {
        super::auth::register(self, request).await
    }
}

#[async_trait]
impl CatalogService for ApiClient {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        super::catalog::list_products(self).await
    }

    async fn update_products(&self) -> Result<serde_json::Value, ApiError> {
        super::catalog::update_products(self).await
    }
}
