//! Prediction report retrieval
//!
//! The report is keyed by the correlation id of a successful prediction.
//! Without an id there is nothing to fetch and the download stays disabled.

use pw_common::api::{validate_record_id, Endpoints};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::backend::Backend;
use crate::error::Result;
use crate::predict::PredictView;

pub struct ReportFetcher {
    backend: Arc<dyn Backend>,
    endpoints: Endpoints,
}

impl ReportFetcher {
    pub fn new(backend: Arc<dyn Backend>, endpoints: Endpoints) -> Self {
        Self { backend, endpoints }
    }

    /// Document URL for `id`, or `None` when there is no usable id
    pub fn target(&self, id: Option<&str>) -> Option<String> {
        id.and_then(|id| self.endpoints.report(id).ok())
    }

    /// Download target for the current prediction view
    pub fn target_for(&self, view: &PredictView) -> Option<String> {
        if !view.download_enabled() {
            return None;
        }
        self.target(view.prediction_id.as_deref())
    }

    /// Fetch the report and write it into `dest_dir`
    ///
    /// Returns the written path. The file name comes from the service.
    pub async fn download(&self, id: &str, dest_dir: &Path) -> Result<PathBuf> {
        validate_record_id(id)?;

        let document = self.backend.fetch_report(id).await?;
        let path = dest_dir.join(&document.filename);
        tokio::fs::write(&path, &document.bytes).await?;

        info!(id = id, path = %path.display(), "Report saved");
        Ok(path)
    }
}
