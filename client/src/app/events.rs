//! # Application Events
//!
//! Results of controller tasks, sent from tokio tasks back to the
//! orchestrator. Each is tagged with the [`MountId`] of the controller
//! instance that started it.

use shared::Product;

use super::scope::MountId;
use crate::core::error::ApiError;

/// Auth surface task results
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// `POST /login` settled
    LoginFinished {
        email: String,
        result: Result<(), ApiError>,
    },
    /// Success toast has been visible long enough; commit the session
    LoginCommitDue { email: String },
    /// `POST /register` settled
    RegisterFinished(Result<(), ApiError>),
    /// Clear the registration form
    RegisterResetDue,
}

/// Catalog surface task results
#[derive(Debug, Clone)]
pub enum CatalogEvent {
    /// `GET /products` settled
    ProductsLoaded(Result<Vec<Product>, ApiError>),
    /// `POST /update-products` settled
    RegenerationFinished(Result<serde_json::Value, ApiError>),
    /// Post-regeneration delay elapsed; re-read the catalog
    RefetchDue,
}

/// Async task results sent to the orchestrator
#[derive(Debug, Clone)]
pub enum AppEvent {
    Auth { mount: MountId, event: AuthEvent },
    Catalog { mount: MountId, event: CatalogEvent },
}

impl AppEvent {
    pub fn mount(&self) -> MountId {
        match self {
            AppEvent::Auth { mount, .. } | AppEvent::Catalog { mount, .. } => *mount,
        }
    }
}
