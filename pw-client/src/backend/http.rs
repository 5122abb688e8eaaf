//! reqwest implementation of [`Backend`]
//!
//! Maps transport outcomes onto [`ClientError`]:
//! - reqwest timeout → `Timeout`
//! - any other transport failure (no response) → `Network`
//! - non-2xx with `{ "error": ... }` → `Server` carrying that message
//! - non-2xx without a usable body → `Server` with a generic message
//! - 2xx with an unreadable body → `Server` with a generic message

use async_trait::async_trait;
use pw_common::api::{
    ContactMessage, Endpoints, ErrorResponse, HistoryRecord, MessageResponse, PredictionRequest,
    PredictionResult,
};
use pw_common::config::ClientConfig;
use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{Backend, ReportDocument, DEFAULT_REPORT_FILENAME};
use crate::error::{ClientError, Result};

const USER_AGENT: &str = concat!("pw-client/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the PredictWell REST service
pub struct HttpBackend {
    http_client: reqwest::Client,
    endpoints: Endpoints,
    predict_timeout: Duration,
    request_timeout: Duration,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoints: Endpoints::new(&config.api_url),
            predict_timeout: config.predict_timeout,
            request_timeout: config.request_timeout,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        let url = self.endpoints.predict();
        tracing::debug!(url = %url, timeout = ?self.predict_timeout, "Submitting prediction");

        let response = self
            .http_client
            .post(&url)
            .timeout(self.predict_timeout)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let result: PredictionResult = read_json(ensure_success(response).await?).await?;

        tracing::info!(
            result = %result.result,
            id = result.id.as_deref().unwrap_or("-"),
            "Prediction received"
        );
        Ok(result)
    }

    async fn list_history(&self) -> Result<Vec<HistoryRecord>> {
        let url = self.endpoints.history();
        tracing::debug!(url = %url, "Fetching history");

        let response = self
            .http_client
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let records: Vec<HistoryRecord> = read_json(ensure_success(response).await?).await?;

        tracing::info!(count = records.len(), "History fetched");
        Ok(records)
    }

    async fn delete_history(&self, id: &str) -> Result<()> {
        let url = self.endpoints.history_item(id)?;
        tracing::debug!(url = %url, "Deleting history record");

        let response = self
            .http_client
            .delete(&url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let response = ensure_success(response).await?;
        log_acknowledgement(response, "History record deleted").await;
        Ok(())
    }

    async fn send_contact(&self, message: &ContactMessage) -> Result<()> {
        let url = self.endpoints.contact();
        tracing::debug!(url = %url, "Sending contact message");

        let response = self
            .http_client
            .post(&url)
            .timeout(self.request_timeout)
            .json(message)
            .send()
            .await
            .map_err(transport_error)?;

        let response = ensure_success(response).await?;
        log_acknowledgement(response, "Contact message sent").await;
        Ok(())
    }

    async fn fetch_report(&self, id: &str) -> Result<ReportDocument> {
        let url = self.endpoints.report(id)?;
        tracing::debug!(url = %url, "Downloading report");

        let response = self
            .http_client
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let response = ensure_success(response).await?;

        let header_str = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let filename = header_str(CONTENT_DISPOSITION)
            .as_deref()
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| DEFAULT_REPORT_FILENAME.to_string());
        let content_type = header_str(CONTENT_TYPE);

        let bytes = response.bytes().await.map_err(transport_error)?.to_vec();

        tracing::info!(id = id, filename = %filename, size = bytes.len(), "Report downloaded");
        Ok(ReportDocument {
            filename,
            content_type,
            bytes,
        })
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        tracing::warn!("Request timed out: {}", err);
        ClientError::Timeout
    } else {
        tracing::warn!("Request failed without response: {}", err);
        ClientError::Network(err.to_string())
    }
}

/// Turn a non-2xx response into a `Server` error, passing 2xx through
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let code = status.as_u16();
    let err = match response.bytes().await {
        Ok(body) => match serde_json::from_slice::<ErrorResponse>(&body) {
            Ok(envelope) if !envelope.error.trim().is_empty() => ClientError::Server {
                status: code,
                message: envelope.error,
            },
            _ => ClientError::unexpected_status(code),
        },
        Err(e) if e.is_timeout() => ClientError::Timeout,
        Err(_) => ClientError::unexpected_status(code),
    };

    tracing::warn!(status = code, error = %err, "Service returned an error");
    Err(err)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status().as_u16();
    response.json::<T>().await.map_err(|e| {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            tracing::warn!(status = status, "Unreadable response body: {}", e);
            ClientError::Server {
                status,
                message: "Unexpected response from the PredictWell service.".to_string(),
            }
        }
    })
}

async fn log_acknowledgement(response: Response, what: &str) {
    match response.json::<MessageResponse>().await {
        Ok(ack) => tracing::info!(message = %ack.message, "{}", what),
        Err(_) => tracing::info!("{}", what),
    }
}

/// Extract a safe file name from a `Content-Disposition` header
///
/// Only the final path component is kept so a hostile header cannot steer
/// the download outside the destination directory.
pub(crate) fn filename_from_disposition(header: &str) -> Option<String> {
    let raw = header.split(';').map(str::trim).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("filename")
            .then(|| value.trim().trim_matches('"').to_string())
    })?;

    let name = raw.rsplit(|c| c == '/' || c == '\\').next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}
