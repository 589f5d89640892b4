//! # Service Traits
//!
//! Traits for dependency injection. The controllers only ever see these, so
//! the same state machines run against the real HTTP services, the offline
//! demo backend, or test doubles. The implementation is picked once, when the
//! [`crate::app::App`] is assembled.

use async_trait::async_trait;
use shared::{LoginRequest, Product, RegisterRequest};

use super::error::{ApiError, StorageError};

/// Authentication endpoint operations.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// `POST /login`. Success carries no payload the client uses.
    async fn login(&self, request: LoginRequest) -> Result<(), ApiError>;

    /// `POST /register`. Registration does not sign the user in.
    async fn register(&self, request: RegisterRequest) -> Result<(), ApiError>;
}

/// Catalog endpoint operations.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// `GET /products`, already normalized (non-array bodies are empty).
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// `POST /update-products`, asking the server to regenerate the catalog.
    ///
    /// The body is returned only so it can be logged.
    async fn update_products(&self) -> Result<serde_json::Value, ApiError>;
}

/// Durable string key/value storage for the client session.
///
/// Stands in for browser local storage: values survive restarts of the same
/// client and are shared by everything in the process.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
