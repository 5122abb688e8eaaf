//! # PredictWell Client
//!
//! Client-side workflows for the PredictWell diabetes-risk service:
//! - Prediction form state, validation and submission ([`predict`], [`form`])
//! - Report download ([`report`])
//! - Prediction history list ([`history`])
//! - Contact form ([`contact`])
//!
//! All remote calls go through the [`backend::Backend`] trait.

pub mod backend;
pub mod contact;
pub mod error;
pub mod form;
pub mod history;
pub mod predict;
pub mod report;

#[cfg(test)]
mod test_support;

pub use error::{ClientError, Result};

use pw_common::api::Endpoints;
use pw_common::config::ClientConfig;
use std::sync::Arc;

use backend::{Backend, HttpBackend};
use contact::ContactController;
use history::HistoryController;
use predict::SubmissionController;
use report::ReportFetcher;

/// One instance of every workflow, sharing a backend
pub struct Workflows {
    pub predict: SubmissionController,
    pub report: ReportFetcher,
    pub history: HistoryController,
    pub contact: ContactController,
}

impl Workflows {
    /// Wire every workflow to the HTTP backend described by `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(config)?);
        Ok(Self::with_backend(backend, config))
    }

    pub fn with_backend(backend: Arc<dyn Backend>, config: &ClientConfig) -> Self {
        Self {
            predict: SubmissionController::new(backend.clone()),
            report: ReportFetcher::new(backend.clone(), Endpoints::new(&config.api_url)),
            history: HistoryController::new(backend.clone()),
            contact: ContactController::new(backend, config.banner_duration),
        }
    }
}
