//! # Backend API Client Module
//!
//! reqwest-backed implementation of [`crate::core::service::AuthService`] and
//! [`crate::core::service::CatalogService`].
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs      - Module exports
//! ├── client.rs   - ApiClient struct and trait impls
//! ├── auth.rs     - POST /login, POST /register
//! ├── catalog.rs  - GET /products, POST /update-products
//! └── tests.rs    - Endpoint behavior against a local axum server
//! ```

pub mod auth;
pub mod catalog;
pub mod client;


pub use client::ApiClient;
