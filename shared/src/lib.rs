//! # Shared Data Transfer Objects Library
//!
//! This library defines the wire contract between the catalog client and the
//! two services it talks to: the authentication API and the product catalog
//! API. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Login and registration requests, error bodies
//!   - **[`dto::catalog`]**: Product records and collection normalization
//!
//! ## Wire Format
//!
//! - Auth requests use the field names the auth service expects, including
//!   the camelCase `confirmPassword` on registration.
//! - Product fields are all optional. `id` and `price` accept either a JSON
//!   string or a JSON number and are normalized to strings.
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::catalog::products_from_value;
//!
//! let body = serde_json::json!([{ "title": "Notebook", "price": "R$ 3.499,00" }]);
//! let products = products_from_value(body);
//! assert_eq!(products.len(), 1);
//!
//! // Anything that is not an array is an empty catalog.
//! assert!(products_from_value(serde_json::json!({ "status": "ok" })).is_empty());
//! ```

pub mod dto;

// Re-export commonly used types for convenience
pub use dto::*;
