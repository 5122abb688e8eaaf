//! Prediction submission workflow
//!
//! State machine: `Idle → Validating → Submitting → Succeeded | Failed`, and
//! back through `Validating` on the next submit (or to `Idle` on [`reset`]).
//!
//! Each submit attempt supersedes any attempt still in flight: the older
//! request is cancelled and its outcome is never written to the view. A
//! generation counter guards the write so a response racing the cancellation
//! cannot land either. Dropping a submit future mid-flight returns the view
//! to `Idle` so the in-flight flag never outlives its request.
//!
//! [`reset`]: SubmissionController::reset

use pw_common::api::PredictionResult;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::backend::Backend;
use crate::error::ClientError;
use crate::form::PredictionForm;

/// Status text shown while a prediction is in flight
pub const PROCESSING_MESSAGE: &str = "Processing your prediction... Please wait.";

/// Workflow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// Render-ready snapshot of the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictView {
    pub phase: SubmissionPhase,
    /// Classification label, verbatim from the service
    pub result: Option<String>,
    pub prediction_id: Option<String>,
    pub error: Option<String>,
    /// In-flight flag; drives the spinner and disables the submit control
    pub loading: bool,
}

impl PredictView {
    fn idle() -> Self {
        Self {
            phase: SubmissionPhase::Idle,
            result: None,
            prediction_id: None,
            error: None,
            loading: false,
        }
    }

    pub fn submit_enabled(&self) -> bool {
        !self.loading
    }

    /// `"Result: <label>"` once a prediction succeeded
    pub fn result_line(&self) -> Option<String> {
        self.result.as_ref().map(|r| format!("Result: {}", r))
    }

    /// The report download needs both a result and a correlation id
    pub fn download_enabled(&self) -> bool {
        self.result.is_some() && self.prediction_id.is_some()
    }

    pub fn status_line(&self) -> Option<&'static str> {
        self.loading.then_some(PROCESSING_MESSAGE)
    }
}

impl Default for PredictView {
    fn default() -> Self {
        Self::idle()
    }
}

/// What a single [`SubmissionController::submit`] call ended with
#[derive(Debug)]
pub enum SubmitOutcome {
    Succeeded(PredictionResult),
    Failed(ClientError),
    /// A later submit (or reset) replaced this one; the view reflects the later call
    Superseded,
}

struct ControllerState {
    view: PredictView,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl ControllerState {
    /// Start a new generation, cancelling whatever was in flight
    fn supersede(&mut self) -> u64 {
        self.generation += 1;
        if let Some(previous) = self.in_flight.take() {
            debug!(generation = self.generation, "Cancelling superseded prediction request");
            previous.cancel();
        }
        self.generation
    }

    /// Clear the in-flight flag of an abandoned request, if it is still current
    fn abandon(&mut self, generation: u64) {
        if self.generation == generation && self.view.loading {
            debug!(generation, "Prediction request abandoned by caller");
            self.in_flight = None;
            self.view = PredictView::idle();
        }
    }
}

/// Clears the in-flight state when a submit future is dropped before finishing
struct InFlightGuard {
    state: Arc<Mutex<ControllerState>>,
    generation: u64,
    armed: bool,
}

impl InFlightGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let generation = self.generation;
        match self.state.try_lock() {
            Ok(mut state) => state.abandon(generation),
            Err(_) => {
                // Lock is busy; finish the cleanup on the runtime
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    let state = self.state.clone();
                    handle.spawn(async move {
                        state.lock().await.abandon(generation);
                    });
                }
            }
        }
    }
}

/// Owns the prediction view state and drives submissions against a [`Backend`]
pub struct SubmissionController {
    backend: Arc<dyn Backend>,
    state: Arc<Mutex<ControllerState>>,
}

impl SubmissionController {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(ControllerState {
                view: PredictView::idle(),
                generation: 0,
                in_flight: None,
            })),
        }
    }

    /// Current view snapshot
    pub async fn view(&self) -> PredictView {
        self.state.lock().await.view.clone()
    }

    /// Drop the current result and cancel any in-flight request
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.supersede();
        state.view = PredictView::idle();
    }

    /// Validate `form` and, if valid, submit it
    ///
    /// Validation failures never reach the network. Nothing is retried: a
    /// failed or timed-out call leaves the controller ready for the next submit.
    pub async fn submit(&self, form: &PredictionForm) -> SubmitOutcome {
        let (generation, token, request) = {
            let mut state = self.state.lock().await;
            let generation = state.supersede();

            state.view = PredictView {
                phase: SubmissionPhase::Validating,
                ..PredictView::idle()
            };

            let request = match form.validate() {
                Ok(request) => request,
                Err(message) => {
                    warn!(error = %message, "Prediction form rejected");
                    state.view.phase = SubmissionPhase::Failed;
                    state.view.error = Some(message.clone());
                    return SubmitOutcome::Failed(ClientError::Validation(message));
                }
            };

            let token = CancellationToken::new();
            state.in_flight = Some(token.clone());
            state.view.phase = SubmissionPhase::Submitting;
            state.view.loading = true;

            (generation, token, request)
        };

        let mut guard = InFlightGuard {
            state: self.state.clone(),
            generation,
            armed: true,
        };

        debug!(generation, "Prediction request in flight");

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => return SubmitOutcome::Superseded,
            outcome = self.backend.predict(&request) => outcome,
        };

        let mut state = self.state.lock().await;
        guard.disarm();
        if state.generation != generation {
            debug!(generation, "Discarding response of superseded prediction");
            return SubmitOutcome::Superseded;
        }

        state.in_flight = None;
        state.view.loading = false;

        match outcome {
            Ok(result) => {
                info!(result = %result.result, "Prediction succeeded");
                state.view.phase = SubmissionPhase::Succeeded;
                state.view.result = Some(result.result.clone());
                state.view.prediction_id = result.id.clone();
                SubmitOutcome::Succeeded(result)
            }
            Err(err) => {
                error!(kind = err.kind(), "Prediction error: {}", err);
                state.view.phase = SubmissionPhase::Failed;
                state.view.error = Some(err.to_string());
                SubmitOutcome::Failed(err)
            }
        }
    }
}
