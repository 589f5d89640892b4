//! # Catalog Client - Library Root
//!
//! Session-gated client for a product catalog. Users sign in (or register)
//! against an authentication API, then browse and regenerate a product list
//! served by a separate catalog API.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              catalog_client (this crate)               │
//! ├────────────────────────────────────────────────────────┤
//! │  app       - App orchestrator, gate, controllers       │
//! │  services  - HTTP / demo backends, session stores      │
//! │  core      - errors + injected service traits          │
//! └────────────────────────────────────────────────────────┘
//!          │                              │
//!          │ HTTP (auth)                  │ HTTP (catalog)
//!          ▼                              ▼
//! ┌─────────────────┐          ┌─────────────────────────┐
//! │  /api/login     │          │   /products             │
//! │  /api/register  │          │   /update-products      │
//! └─────────────────┘          └─────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: [`app::App`] owns the [`app::SessionGate`] and mounts either the
//!   [`app::AuthFormController`] (`/`) or the [`app::CatalogController`]
//!   (`/products`)
//! - **services**: `api` (reqwest), `demo` (offline), `storage` (memory and
//!   JSON file session stores)
//! - **core**: [`core::error`] and [`core::service`]
//! - **config**: defaults, JSON file and environment overrides
//! - **debug**: tracing subscriber setup
//! - **utils**: form validation
//!
//! ## Event-Driven Updates
//!
//! User actions are plain methods on [`app::App`]. Network calls and timers
//! run as tokio tasks that report back over an `async_channel`; the app
//! applies them in arrival order from [`app::App::on_tick`] or
//! [`app::App::next_event`].

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod services;
pub mod utils;

pub use app::{App, Route, Services, View};
pub use config::ClientConfig;
pub use crate::core::error::{AppError, Result};
