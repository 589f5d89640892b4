//! # Services Module
//!
//! Implementations of the traits in [`crate::core::service`].
//!
//! ```text
//! services/
//! ├── api/        - HTTP auth + catalog client (reqwest)
//! ├── demo.rs     - Offline auth + catalog with built-in accounts
//! └── storage.rs  - Session stores (memory, JSON file)
//! ```
//!
//! The app is assembled with exactly one auth/catalog pair; see
//! [`crate::app::Services`].

pub mod api;
pub mod demo;
pub mod storage;

pub use api::ApiClient;
pub use demo::{DemoAuthService, DemoCatalogService};
pub use storage::{FileStore, MemoryStore};
