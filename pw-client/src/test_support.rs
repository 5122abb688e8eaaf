//! In-memory [`Backend`] for unit tests

use async_trait::async_trait;
use pw_common::api::{ContactMessage, HistoryRecord, PredictionRequest, PredictionResult};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::backend::{Backend, ReportDocument};
use crate::error::{ClientError, Result};
use crate::form::{Field, PredictionForm};

/// Scripted failure, rebuilt into a fresh [`ClientError`] per call
#[derive(Debug, Clone)]
pub enum Failure {
    Timeout,
    Server(u16, &'static str),
    Network,
}

impl Failure {
    fn to_error(&self) -> ClientError {
        match self {
            Failure::Timeout => ClientError::Timeout,
            Failure::Server(status, message) => ClientError::Server {
                status: *status,
                message: message.to_string(),
            },
            Failure::Network => ClientError::Network("connection refused".to_string()),
        }
    }
}

type Scripted<T> = std::result::Result<T, Failure>;

#[derive(Default)]
struct FakeState {
    predict_replies: VecDeque<(Duration, Scripted<PredictionResult>)>,
    predict_calls: Vec<PredictionRequest>,
    history: Vec<HistoryRecord>,
    history_failure: Option<Failure>,
    delete_failure: Option<Failure>,
    deleted: Vec<String>,
    contact_failure: Option<Failure>,
    contacts: Vec<ContactMessage>,
    report: Option<Scripted<ReportDocument>>,
}

/// Backend double with scripted replies and recorded calls
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(self, f: impl FnOnce(&mut FakeState)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn predicts(self, result: &str, id: Option<&str>) -> Self {
        self.predicts_after(Duration::ZERO, result, id)
    }

    pub fn predicts_after(self, delay: Duration, result: &str, id: Option<&str>) -> Self {
        let reply = PredictionResult {
            result: result.to_string(),
            id: id.map(str::to_string),
        };
        self.script(|s| s.predict_replies.push_back((delay, Ok(reply))))
    }

    pub fn predict_fails(self, failure: Failure) -> Self {
        self.script(|s| s.predict_replies.push_back((Duration::ZERO, Err(failure))))
    }

    pub fn with_history(self, records: Vec<HistoryRecord>) -> Self {
        self.script(|s| s.history = records)
    }

    pub fn history_fails(self, failure: Failure) -> Self {
        self.script(|s| s.history_failure = Some(failure))
    }

    pub fn delete_fails(self, failure: Failure) -> Self {
        self.script(|s| s.delete_failure = Some(failure))
    }

    pub fn contact_fails(self, failure: Failure) -> Self {
        self.script(|s| s.contact_failure = Some(failure))
    }

    pub fn with_report(self, report: Scripted<ReportDocument>) -> Self {
        self.script(|s| s.report = Some(report))
    }

    pub fn predict_calls(&self) -> Vec<PredictionRequest> {
        self.state.lock().unwrap().predict_calls.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn contacts(&self) -> Vec<ContactMessage> {
        self.state.lock().unwrap().contacts.clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        let (delay, reply) = {
            let mut state = self.state.lock().unwrap();
            state.predict_calls.push(request.clone());
            state
                .predict_replies
                .pop_front()
                .expect("no scripted prediction reply")
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.map_err(|f| f.to_error())
    }

    async fn list_history(&self) -> Result<Vec<HistoryRecord>> {
        let state = self.state.lock().unwrap();
        match &state.history_failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(state.history.clone()),
        }
    }

    async fn delete_history(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(failure) = &state.delete_failure {
            return Err(failure.to_error());
        }
        state.deleted.push(id.to_string());
        state.history.retain(|r| r.id != id);
        Ok(())
    }

    async fn send_contact(&self, message: &ContactMessage) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(failure) = &state.contact_failure {
            return Err(failure.to_error());
        }
        state.contacts.push(message.clone());
        Ok(())
    }

    async fn fetch_report(&self, _id: &str) -> Result<ReportDocument> {
        let state = self.state.lock().unwrap();
        match state.report.clone() {
            Some(reply) => reply.map_err(|f| f.to_error()),
            None => Err(Failure::Server(404, "Prediction not found").to_error()),
        }
    }
}

/// The worked example: a fully valid low-risk input set
pub fn example_form() -> PredictionForm {
    PredictionForm::new()
        .with(Field::Pregnancies, "2")
        .with(Field::Glucose, "120")
        .with(Field::BloodPressure, "70")
        .with(Field::SkinThickness, "20")
        .with(Field::Insulin, "80")
        .with(Field::Bmi, "25.5")
        .with(Field::DiabetesPedigree, "0.5")
        .with(Field::Age, "30")
}

pub fn history_record(id: &str, result: &str) -> HistoryRecord {
    HistoryRecord {
        id: id.to_string(),
        timestamp: "2024-10-01T12:30:00Z".to_string(),
        result: result.to_string(),
        input: json!({ "age": "30", "glucose": "120" }),
    }
}
