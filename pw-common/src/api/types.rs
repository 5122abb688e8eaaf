//! Shared API request/response types
//!
//! Wire shapes of the remote PredictWell REST service. Field names follow the
//! service's JSON (camelCase for prediction inputs, `_id` for store records).

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ========================================
// Prediction Types
// ========================================

/// Body of `POST /api/predict`
///
/// Built from validated form state at submit time and dropped once the call
/// completes. Values travel as JSON numbers.
///
/// # Examples
///
/// ```
/// use pw_common::api::PredictionRequest;
///
/// let request = PredictionRequest {
///     pregnancies: 2.0,
///     glucose: 120.0,
///     blood_pressure: 70.0,
///     skin_thickness: 20.0,
///     insulin: 80.0,
///     bmi: 25.5,
///     diabetes_pedigree: 0.5,
///     age: 30.0,
/// };
/// let json = serde_json::to_value(&request).unwrap();
/// assert_eq!(json["bloodPressure"], 70.0);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree: f64,
    pub age: f64,
}

/// Successful reply of `POST /api/predict`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PredictionResult {
    /// Classification label ("High Risk", "Low Risk", ...), shown verbatim
    pub result: String,

    /// Correlation token for `GET /api/report/{id}`
    ///
    /// Absent when the store did not persist the prediction; the report
    /// download stays disabled in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

// ========================================
// History Types
// ========================================

/// One entry of `GET /api/history`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistoryRecord {
    #[serde(rename = "_id")]
    pub id: String,

    /// Raw timestamp as sent by the store (see [`crate::time::parse_timestamp`])
    pub timestamp: String,

    pub result: String,

    /// Inputs exactly as they were submitted
    #[serde(default)]
    pub input: Value,
}

impl HistoryRecord {
    /// Timestamp rendered in local time
    pub fn display_timestamp(&self) -> String {
        crate::time::display_local(&self.timestamp)
    }

    /// Inputs rendered as compact JSON
    pub fn input_summary(&self) -> String {
        self.input.to_string()
    }
}

// ========================================
// Contact Types
// ========================================

/// Body of `POST /api/contact`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

// ========================================
// Envelope Types
// ========================================

/// Error envelope returned with non-2xx statuses
///
/// ```json
/// { "error": "Invalid input data. All fields must be numbers." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Acknowledgement envelope of delete and contact calls
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
