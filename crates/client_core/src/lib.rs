//! Prediction exchange client and submission lifecycle.
//!
//! [`PredictionClient`] performs the single network exchange of the system:
//! one `POST /predict` with a coerced payload, answered by either a numeric
//! price or a failure the UI can show. [`SubmissionState`] is the single
//! source of truth for where that exchange currently stands.

use std::time::Duration;

use reqwest::Client as HttpClient;
use shared::protocol::{ErrorBody, PredictionRequest, PredictionResponse};
use thiserror::Error;
use url::Url;

/// Fallback shown when the service gives no usable failure detail.
pub const GENERIC_FAILURE_MESSAGE: &str = "Price prediction failed; please try again.";

/// Everything that can go wrong in one prediction exchange.
///
/// Classification happens at the source instead of by sniffing message
/// text: each failure site maps onto exactly one variant.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid prediction endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("prediction service unreachable: {0}")]
    Transport(String),
    #[error("prediction request timed out after {0:?}")]
    Timeout(Duration),
    #[error("prediction service rejected the request (status {status})")]
    Rejected { status: u16, detail: Option<String> },
    #[error("prediction service returned an unreadable response")]
    MalformedResponse,
}

impl PredictError {
    /// The one user-visible message for this failure: a server-supplied
    /// detail verbatim when present, otherwise a fallback.
    pub fn user_message(&self) -> String {
        match self {
            PredictError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            PredictError::Timeout(deadline) => format!(
                "The prediction service did not answer within {}s; please try again.",
                deadline.as_secs()
            ),
            PredictError::InvalidEndpoint { url, .. } => {
                format!("'{url}' is not a valid prediction service URL.")
            }
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// HTTP client for the prediction service.
///
/// Construction validates the endpoint and pins the request deadline, so a
/// hung service resolves to [`PredictError::Timeout`] instead of leaving the
/// submission in flight forever.
#[derive(Debug)]
pub struct PredictionClient {
    http: HttpClient,
    endpoint: Url,
    request_timeout: Duration,
}

impl PredictionClient {
    pub fn new(server_url: &str, request_timeout: Duration) -> Result<Self, PredictError> {
        let endpoint = predict_endpoint(server_url)?;
        let http = HttpClient::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| PredictError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            request_timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Performs the exchange. The request is taken by reference but has
    /// already been snapshotted by value from the form store, so edits made
    /// while this awaits cannot touch the in-transit payload.
    pub async fn predict(&self, request: &PredictionRequest) -> Result<f64, PredictError> {
        tracing::debug!(endpoint = %self.endpoint, "submitting prediction request");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| self.classify_exchange_error(err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| self.classify_exchange_error(err))?;

        if !status.is_success() {
            return Err(PredictError::Rejected {
                status: status.as_u16(),
                detail: failure_detail(&body),
            });
        }

        decode_predicted_price(&body).ok_or(PredictError::MalformedResponse)
    }

    fn classify_exchange_error(&self, err: reqwest::Error) -> PredictError {
        if err.is_timeout() {
            PredictError::Timeout(self.request_timeout)
        } else {
            PredictError::Transport(err.to_string())
        }
    }
}

fn predict_endpoint(server_url: &str) -> Result<Url, PredictError> {
    let invalid = |reason: String| PredictError::InvalidEndpoint {
        url: server_url.trim().to_string(),
        reason,
    };
    let mut base = Url::parse(server_url.trim()).map_err(|err| invalid(err.to_string()))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("predict")
        .map_err(|err| invalid(err.to_string()))
}

/// Extracts the optional server-supplied failure message.
fn failure_detail(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.detail)
        .filter(|detail| !detail.is_empty())
}

/// Fail-closed success decode: the body must carry a finite numeric
/// `predicted_price`, anything else counts as malformed.
fn decode_predicted_price(body: &[u8]) -> Option<f64> {
    serde_json::from_slice::<PredictionResponse>(body)
        .ok()
        .map(|response| response.predicted_price)
        .filter(|price| price.is_finite())
}

/// Lifecycle of the one submission the system allows at a time.
///
/// Exactly one variant holds at any instant, so a price and a failure
/// message can never be populated together. Every terminal state is
/// re-enterable by a fresh submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded(f64),
    Failed(String),
}

impl SubmissionState {
    /// Starts a new submission, clearing any previous outcome. Returns
    /// false (unchanged) while one is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_in_flight() {
            return false;
        }
        *self = SubmissionState::InFlight;
        true
    }

    /// Resolves the in-flight submission with a price. Stale resolutions
    /// (nothing in flight) are ignored.
    pub fn resolve_success(&mut self, price: f64) {
        if self.is_in_flight() {
            *self = SubmissionState::Succeeded(price);
        }
    }

    /// Resolves the in-flight submission with a user-visible message.
    pub fn resolve_failure(&mut self, message: impl Into<String>) {
        if self.is_in_flight() {
            *self = SubmissionState::Failed(message.into());
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionState::InFlight)
    }

    pub fn price(&self) -> Option<f64> {
        match self {
            SubmissionState::Succeeded(price) => Some(*price),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            SubmissionState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
