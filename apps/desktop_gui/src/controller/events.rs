//! UI/backend events and error modeling for the estimator controller.

use client_core::PredictError;

pub enum UiEvent {
    WorkerReady,
    Info(String),
    PredictionReady(f64),
    PredictionFailed(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    Timeout,
    Service,
    Response,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Timeout => "Timeout",
        UiErrorCategory::Service => "Service",
        UiErrorCategory::Response => "Response",
    }
}

/// A failure ready for display: category for the status line, message for
/// the alert. The message is already user-facing (server detail verbatim,
/// or a fallback).
#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    message: String,
}

impl UiError {
    pub fn new(category: UiErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&PredictError> for UiError {
    fn from(err: &PredictError) -> Self {
        let category = match err {
            PredictError::InvalidEndpoint { .. } => UiErrorCategory::Validation,
            PredictError::Transport(_) => UiErrorCategory::Transport,
            PredictError::Timeout(_) => UiErrorCategory::Timeout,
            PredictError::Rejected { .. } => UiErrorCategory::Service,
            PredictError::MalformedResponse => UiErrorCategory::Response,
        };
        Self::new(category, err.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::GENERIC_FAILURE_MESSAGE;
    use std::time::Duration;

    #[test]
    fn rejection_detail_travels_verbatim_into_the_ui_error() {
        let err = PredictError::Rejected {
            status: 422,
            detail: Some("grade must be between 1 and 13".to_string()),
        };
        let ui_err = UiError::from(&err);
        assert_eq!(ui_err.category(), UiErrorCategory::Service);
        assert_eq!(ui_err.message(), "grade must be between 1 and 13");
    }

    #[test]
    fn transport_and_malformed_failures_use_the_generic_message() {
        let transport = UiError::from(&PredictError::Transport("connection refused".to_string()));
        assert_eq!(transport.category(), UiErrorCategory::Transport);
        assert_eq!(transport.message(), GENERIC_FAILURE_MESSAGE);

        let malformed = UiError::from(&PredictError::MalformedResponse);
        assert_eq!(malformed.category(), UiErrorCategory::Response);
        assert_eq!(malformed.message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn timeouts_get_their_own_message() {
        let err = UiError::from(&PredictError::Timeout(Duration::from_secs(30)));
        assert_eq!(err.category(), UiErrorCategory::Timeout);
        assert!(err.message().contains("30s"));
    }
}
