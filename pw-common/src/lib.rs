//! # PredictWell Common Library
//!
//! Shared code for the PredictWell client including:
//! - REST request/response types for the remote prediction service
//! - Endpoint path construction
//! - Configuration loading
//! - Timestamp utilities

pub mod api;
pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
