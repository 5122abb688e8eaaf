//! Stub PredictWell service for integration tests
//!
//! Serves the five REST endpoints from an in-memory store on an ephemeral
//! localhost port. The risk rule is a fixed glucose threshold so tests can
//! choose the label they expect.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use pw_common::config::ClientConfig;
use serde_json::{json, Value};

/// Wire keys in declared order
pub const FIELDS: [&str; 8] = [
    "pregnancies",
    "glucose",
    "bloodPressure",
    "skinThickness",
    "insulin",
    "bmi",
    "diabetesPedigree",
    "age",
];

/// Glucose at or above this value is classified "High Risk"
pub const HIGH_RISK_GLUCOSE: f64 = 140.0;

/// Bind `router` to 127.0.0.1 on an ephemeral port and return its base URL
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind stub listener");
    let addr = listener.local_addr().expect("Should have local address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Stub server failed");
    });

    format!("http://{}", addr)
}

/// Base URL of a port nothing listens on
pub async fn refused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind probe listener");
    let addr = listener.local_addr().expect("Should have local address");
    drop(listener);
    format!("http://{}", addr)
}

/// Client config with short budgets pointed at `base_url`
pub fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig {
        api_url: base_url.to_string(),
        predict_timeout: Duration::from_secs(5),
        request_timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    }
}

#[derive(Default)]
struct StoreInner {
    records: Vec<Value>,
    contacts: Vec<Value>,
    next_id: u64,
}

/// In-memory prediction and contact store
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed a stored prediction, returning its id
    pub fn insert(&self, input: Value, result: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = format!("{:024x}", inner.next_id);
        inner.records.push(json!({
            "_id": id,
            "timestamp": chrono::Utc::now().to_rfc2822(),
            "result": result,
            "input": input,
        }));
        id
    }

    pub fn record_ids(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .records
            .iter()
            .filter_map(|r| r["_id"].as_str().map(str::to_string))
            .collect()
    }

    pub fn contacts(&self) -> Vec<Value> {
        self.inner.lock().unwrap().contacts.clone()
    }

    fn find(&self, id: &str) -> Option<Value> {
        self.inner
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|r| r["_id"] == id)
            .cloned()
    }
}

/// Router implementing the full service contract over `store`
pub fn prediction_service(store: Arc<MemoryStore>) -> Router {
    Router::new()
        .route("/api/predict", post(predict))
        .route("/api/history", get(list_history))
        .route("/api/history/:id", delete(delete_history))
        .route("/api/contact", post(contact))
        .route("/api/report/:id", get(report))
        .with_state(store)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

async fn predict(State(store): State<Arc<MemoryStore>>, Json(body): Json<Value>) -> Response {
    let values: Option<Vec<f64>> = FIELDS
        .iter()
        .map(|key| body.get(*key).and_then(as_number))
        .collect();

    let Some(values) = values else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid input data. All fields must be numbers." })),
        )
            .into_response();
    };

    let result = if values[1] >= HIGH_RISK_GLUCOSE {
        "High Risk"
    } else {
        "Low Risk"
    };
    let id = store.insert(body, result);

    Json(json!({ "result": result, "id": id })).into_response()
}

async fn list_history(State(store): State<Arc<MemoryStore>>) -> Json<Value> {
    let mut records = store.inner.lock().unwrap().records.clone();
    // Newest first
    records.reverse();
    Json(Value::Array(records))
}

async fn delete_history(
    State(store): State<Arc<MemoryStore>>,
    Path(id): Path<String>,
) -> Json<Value> {
    store.inner.lock().unwrap().records.retain(|r| r["_id"] != id.as_str());
    Json(json!({ "message": "Prediction deleted" }))
}

async fn contact(State(store): State<Arc<MemoryStore>>, Json(body): Json<Value>) -> Json<Value> {
    store.inner.lock().unwrap().contacts.push(body);
    Json(json!({ "message": "Message sent successfully" }))
}

async fn report(State(store): State<Arc<MemoryStore>>, Path(id): Path<String>) -> Response {
    let Some(record) = store.find(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Prediction not found" })),
        )
            .into_response();
    };

    let body = format!(
        "%PDF-1.4\nPredictWell: Diabetes Prediction Report\nResult: {}\n",
        record["result"].as_str().unwrap_or_default()
    );

    (
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"prediction_report.pdf\"",
            ),
        ],
        body,
    )
        .into_response()
}
