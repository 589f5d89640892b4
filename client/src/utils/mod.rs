//! # Utility Functions
//!
//! - **[`validation`]**: Email pattern and auth form validation

pub mod validation;
