use std::time::Duration;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

mod backend_bridge;
mod controller;
mod ui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{EstimatorApp, PersistedEstimatorSettings, StartupConfig, SETTINGS_STORAGE_KEY};

/// House price estimator desktop client.
#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the prediction service; overrides the last-used value.
    #[arg(long)]
    server_url: Option<String>,
    /// Deadline in seconds for one prediction exchange.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(8);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(cmd_rx, ui_tx);

    let startup = StartupConfig {
        server_url: args.server_url,
        request_timeout: args
            .timeout_secs
            .map(|secs| Duration::from_secs(secs.clamp(1, 600))),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("House Price Estimator")
            .with_inner_size([760.0, 880.0])
            .with_min_inner_size([560.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "House Price Estimator",
        options,
        Box::new(|cc| {
            let persisted_settings = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| {
                        serde_json::from_str::<PersistedEstimatorSettings>(&text).ok()
                    })
            });
            Ok(Box::new(EstimatorApp::new(
                cmd_tx,
                ui_rx,
                persisted_settings,
                startup,
            )))
        }),
    )
}
