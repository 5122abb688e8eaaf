//! Remote service seam
//!
//! Every client workflow talks to the PredictWell service through the
//! [`Backend`] trait. [`HttpBackend`] is the production implementation; tests
//! substitute in-memory fakes.

use async_trait::async_trait;
use pw_common::api::{ContactMessage, HistoryRecord, PredictionRequest, PredictionResult};

use crate::error::Result;

pub mod http;

pub use http::HttpBackend;

/// File name used when the service does not name the report
pub const DEFAULT_REPORT_FILENAME: &str = "prediction_report.pdf";

/// Downloaded report document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Remote PredictWell operations
///
/// Implementations classify failures into [`crate::ClientError`] variants;
/// callers never inspect transport-specific errors.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /api/predict`
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult>;

    /// `GET /api/history`
    async fn list_history(&self) -> Result<Vec<HistoryRecord>>;

    /// `DELETE /api/history/{id}`
    async fn delete_history(&self, id: &str) -> Result<()>;

    /// `POST /api/contact`
    async fn send_contact(&self, message: &ContactMessage) -> Result<()>;

    /// `GET /api/report/{id}`
    async fn fetch_report(&self, id: &str) -> Result<ReportDocument>;
}
