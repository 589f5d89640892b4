//! # Core Abstractions
//!
//! Core traits and error types shared by the controllers and the service
//! implementations.
//!
//! - **[`error`]**: Error taxonomy (`ValidationError`, `ApiError`, `StorageError`, `AppError`)
//! - **[`service`]**: Injected service traits (`AuthService`, `CatalogService`, `SessionStore`)
//!
//! ## Dependency Injection
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use catalog_client::core::service::{AuthService, CatalogService};
//! use catalog_client::services::demo::{DemoAuthService, DemoCatalogService};
//!
//! // Offline backend with built-in accounts
//! let auth: Arc<dyn AuthService> = Arc::new(DemoAuthService::new());
//! let catalog: Arc<dyn CatalogService> = Arc::new(DemoCatalogService::new());
//! ```

pub mod error;
pub mod service;

pub use error::{ApiError, AppError, Result, StorageError, ValidationError};
pub use service::{AuthService, CatalogService, SessionStore};
