//! # Data Transfer Objects (DTOs)
//!
//! Data structures exchanged with the auth and catalog services.
//!
//! ## Module Organization
//!
//! - [`auth`] - Login, registration and error response bodies
//! - [`catalog`] - Product records returned by `GET /products`
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/register
//! Content-Type: application/json
//!
//! {
//!   "name": "Alice",
//!   "email": "alice@example.com",
//!   "password": "secret1",
//!   "confirmPassword": "secret1"
//! }
//! ```
//!
//! ```text
//! POST /update-products
//!
//! HTTP/1.1 500 Internal Server Error
//! { "error": "quota exceeded" }
//! ```

pub mod auth;
pub mod catalog;

pub use auth::*;
pub use catalog::*;
