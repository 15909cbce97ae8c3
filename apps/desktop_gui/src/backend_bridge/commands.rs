//! Backend commands queued from UI to the prediction worker.

use std::time::Duration;

use shared::protocol::PredictionRequest;

pub enum BackendCommand {
    /// One prediction exchange. Carries a by-value snapshot of the form, so
    /// edits made while the request is in flight cannot alter the payload.
    Predict {
        server_url: String,
        request_timeout: Duration,
        request: PredictionRequest,
    },
}
