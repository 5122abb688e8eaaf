//! Endpoint paths of the remote PredictWell service
//!
//! All paths hang off a configurable base URL (scheme + host + optional
//! prefix). Record ids are placed into path segments verbatim, so they are
//! checked with [`validate_record_id`] first.

use crate::{Error, Result};

/// URL builder for the five REST endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// Create an endpoint builder for `base_url`
    ///
    /// Trailing slashes are dropped so `http://host/` and `http://host`
    /// produce identical URLs.
    ///
    /// # Examples
    ///
    /// ```
    /// use pw_common::api::Endpoints;
    ///
    /// let endpoints = Endpoints::new("http://localhost:5000/");
    /// assert_eq!(endpoints.predict(), "http://localhost:5000/api/predict");
    /// ```
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// `POST /api/predict`
    pub fn predict(&self) -> String {
        format!("{}/api/predict", self.base)
    }

    /// `GET /api/history`
    pub fn history(&self) -> String {
        format!("{}/api/history", self.base)
    }

    /// `DELETE /api/history/{id}`
    pub fn history_item(&self, id: &str) -> Result<String> {
        validate_record_id(id)?;
        Ok(format!("{}/api/history/{}", self.base, id))
    }

    /// `POST /api/contact`
    pub fn contact(&self) -> String {
        format!("{}/api/contact", self.base)
    }

    /// `GET /api/report/{id}`
    pub fn report(&self, id: &str) -> Result<String> {
        validate_record_id(id)?;
        Ok(format!("{}/api/report/{}", self.base, id))
    }
}

/// Reject ids that would escape their path segment
pub fn validate_record_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidInput("record id is empty".to_string()));
    }

    if id == "." || id == ".." {
        return Err(Error::InvalidInput(format!("record id is a path alias: {:?}", id)));
    }

    if id
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
    {
        return Err(Error::InvalidInput(format!(
            "record id contains reserved characters: {:?}",
            id
        )));
    }

    Ok(())
}
