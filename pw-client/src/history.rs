//! Prediction history list
//!
//! Holds the list fetched from the remote store. Deletes are confirmed by the
//! store before the row leaves the list; there is no optimistic removal.

use pw_common::api::{validate_record_id, HistoryRecord};
use std::sync::Arc;
use tracing::{error, info};

use crate::backend::Backend;
use crate::error::Result;

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: String,
    pub date: String,
    pub result: String,
    pub inputs: String,
}

impl From<&HistoryRecord> for HistoryRow {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            id: record.id.clone(),
            date: record.display_timestamp(),
            result: record.result.clone(),
            inputs: record.input_summary(),
        }
    }
}

pub struct HistoryController {
    backend: Arc<dyn Backend>,
    records: Vec<HistoryRecord>,
}

impl HistoryController {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            records: Vec::new(),
        }
    }

    /// Fetch the full list (called on view activation)
    ///
    /// On failure the current list is kept as is.
    pub async fn load(&mut self) -> Result<&[HistoryRecord]> {
        match self.backend.list_history().await {
            Ok(records) => {
                self.records = records;
                Ok(self.records.as_slice())
            }
            Err(e) => {
                error!(kind = e.kind(), "Error fetching history: {}", e);
                Err(e)
            }
        }
    }

    /// Delete `id` remotely, then drop it from the list
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        validate_record_id(id)?;

        if let Err(e) = self.backend.delete_history(id).await {
            error!(id = id, kind = e.kind(), "Error deleting prediction: {}", e);
            return Err(e);
        }

        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        info!(id = id, removed = before - self.records.len(), "Prediction deleted");
        Ok(())
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn rows(&self) -> Vec<HistoryRow> {
        self.records.iter().map(HistoryRow::from).collect()
    }
}
