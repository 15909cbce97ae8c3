//! Prediction worker: owns the tokio runtime and performs the exchanges.
//!
//! Commands are processed one at a time in queue order, and the UI disables
//! the submit trigger while a submission is in flight, so no two exchanges
//! are ever concurrent.

use std::thread;

use client_core::PredictionClient;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Info(format!(
                    "Prediction worker startup failure: {err}"
                )));
                tracing::error!("failed to build prediction worker runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::WorkerReady);
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Predict {
                        server_url,
                        request_timeout,
                        request,
                    } => {
                        let outcome = match PredictionClient::new(&server_url, request_timeout) {
                            Ok(client) => client.predict(&request).await,
                            Err(err) => Err(err),
                        };
                        let event = match outcome {
                            Ok(price) => {
                                tracing::debug!(price, "prediction exchange succeeded");
                                UiEvent::PredictionReady(price)
                            }
                            Err(err) => {
                                tracing::warn!(error = %err, "prediction exchange failed");
                                UiEvent::PredictionFailed(UiError::from(&err))
                            }
                        };
                        let _ = ui_tx.try_send(event);
                    }
                }
            }
        });
    });
}
