//! # Catalog Endpoints
//!
//! `GET /products` and `POST /update-products` on the catalog API.

use shared::{products_from_value, ErrorResponse, Product};

use super::client::ApiClient;
use crate::core::error::ApiError;

/// Fetch the full product collection.
#[tracing::instrument(skip(client))]
pub async fn list_products(client: &ApiClient) -> Result<Vec<Product>, ApiError> {
    let response = client.client.get(client.catalog_url("/products")).send().await?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "Product fetch rejected");
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message: None,
        });
    }

    // A 2xx body that is not JSON (maintenance page, empty body) is an empty
    // catalog, same as any other non-array body.
    let text = response.text().await?;
    let body = serde_json::from_str::<serde_json::Value>(&text).unwrap_or(serde_json::Value::Null);
    if !body.is_array() {
        tracing::warn!("Product endpoint returned a non-array body - treating as empty");
    }
    let products = products_from_value(body);
    tracing::debug!(count = products.len(), "Products fetched");
    Ok(products)
}

/// Ask the server to regenerate the catalog.
///
/// On failure the `{ "error": ... }` body, when present, becomes the message.
#[tracing::instrument(skip(client))]
pub async fn update_products(client: &ApiClient) -> Result<serde_json::Value, ApiError> {
    let response = client
        .client
        .post(client.catalog_url("/update-products"))
        .send()
        .await?;

    let status = response.status();
    if status.is_success() {
        // Body is informational only; an empty or non-JSON body is still success.
        let body = response.json::<serde_json::Value>().await.unwrap_or(serde_json::Value::Null);
        tracing::info!(response = %body, "Catalog regeneration accepted");
        return Ok(body);
    }

    let message = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .map(|body| body.error)
        .filter(|error| !error.trim().is_empty());
    tracing::warn!(status = status.as_u16(), error = ?message, "Catalog regeneration failed");
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}
