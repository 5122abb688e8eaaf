//! API module for the remote PredictWell REST service
//!
//! Provides the wire types and endpoint paths used by every client workflow.
//!
//! # Design Principle
//!
//! This module contains ONLY:
//! - Shared serde types (no HTTP client dependencies)
//! - Pure path construction
//!
//! The HTTP transport lives in `pw-client`.

pub mod endpoints;
pub mod types;

pub use endpoints::{validate_record_id, Endpoints};
pub use types::{
    ContactMessage, ErrorResponse, HistoryRecord, MessageResponse, PredictionRequest,
    PredictionResult,
};
