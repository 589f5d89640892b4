//! # Logging
//!
//! Tracing subscriber setup for the client binary.
//!
//! - **stderr**: compact human-readable output
//! - **file** (optional): `catalog-client.log` in `log_dir`, rotated daily,
//!   written through a non-blocking appender
//!
//! ## Configuration
//!
//! - `RUST_LOG`: filter directive (default `catalog_client=info,warn`)
//! - `CATALOG_LOG_DIR`: enables the file layer
//!
//! ```rust,no_run
//! use catalog_client::{config::ClientConfig, debug};
//!
//! let config = ClientConfig::default();
//! // Keep the guard alive or buffered file output is lost on exit.
//! let _guard = debug::init(&config);
//! tracing::info!("ready");
//! ```

pub mod logger;

pub use logger::init;
