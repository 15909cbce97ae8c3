use std::time::Duration;

use client_core::SubmissionState;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::fields::FieldSet;
use shared::protocol::PredictionRequest;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

pub const SETTINGS_STORAGE_KEY: &str = "estimator_settings";

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 600;

/// CLI-provided overrides. `None` means "use the persisted or default value".
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub server_url: Option<String>,
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedEstimatorSettings {
    server_url: String,
    request_timeout_secs: u64,
}

impl Default for PersistedEstimatorSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl PersistedEstimatorSettings {
    fn into_runtime(self) -> (String, Duration) {
        (
            self.server_url,
            Duration::from_secs(
                self.request_timeout_secs
                    .clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS),
            ),
        )
    }

    fn from_runtime(server_url: &str, request_timeout: Duration) -> Self {
        Self {
            server_url: server_url.to_string(),
            request_timeout_secs: request_timeout
                .as_secs()
                .clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

/// Pure projection from the submission state to what the result area shows.
#[derive(Debug, Clone, PartialEq)]
enum ResultView {
    Empty,
    Busy,
    Price(String),
    Alert(String),
}

impl ResultView {
    fn project(state: &SubmissionState) -> Self {
        match state {
            SubmissionState::Idle => ResultView::Empty,
            SubmissionState::InFlight => ResultView::Busy,
            SubmissionState::Succeeded(price) => ResultView::Price(format_usd(*price)),
            SubmissionState::Failed(message) => ResultView::Alert(message.clone()),
        }
    }
}

/// US-dollar rendering with thousands grouping and two decimals.
fn format_usd(amount: f64) -> String {
    let negative = amount < 0.0;
    let total_cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (total_cents / 100).to_string();
    let cents = total_cents % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (idx, digit) in dollars.chars().enumerate() {
        if idx > 0 && (dollars.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{cents:02}")
}

pub struct EstimatorApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    server_url: String,
    request_timeout: Duration,

    fields: FieldSet,
    submission: SubmissionState,

    status: String,
    status_banner: Option<StatusBanner>,
}

impl EstimatorApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted_settings: Option<PersistedEstimatorSettings>,
        startup: StartupConfig,
    ) -> Self {
        let (mut server_url, mut request_timeout) =
            persisted_settings.unwrap_or_default().into_runtime();
        if let Some(url) = startup.server_url {
            server_url = url;
        }
        if let Some(timeout) = startup.request_timeout {
            request_timeout = timeout;
        }

        Self {
            cmd_tx,
            ui_rx,
            server_url,
            request_timeout,
            fields: FieldSet::default(),
            submission: SubmissionState::default(),
            status: "Starting prediction worker...".to_string(),
            status_banner: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::WorkerReady => {
                    if !self.submission.is_in_flight() {
                        self.status = "Ready".to_string();
                    }
                }
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::PredictionReady(price) => {
                    self.submission.resolve_success(price);
                    self.status = "Estimate ready".to_string();
                }
                UiEvent::PredictionFailed(err) => {
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                    self.submission.resolve_failure(err.message().to_string());
                }
            }
        }
    }

    /// One end-to-end submit trigger: snapshot the form by value, flip the
    /// state machine to in-flight, and queue the exchange. The UI disables
    /// the trigger while in flight, so this never runs concurrently.
    fn try_submit(&mut self) {
        if self.submission.is_in_flight() {
            return;
        }

        let server_url = self.server_url.trim().to_string();
        if server_url.is_empty() {
            self.status = "Server URL is required".to_string();
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Error,
                message: "Please enter the prediction server URL.".to_string(),
            });
            return;
        }

        let request = PredictionRequest::from_fields(&self.fields);
        self.submission.begin();
        self.status_banner = None;
        self.status = "Estimating price...".to_string();

        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Predict {
                server_url,
                request_timeout: self.request_timeout,
                request,
            },
            &mut self.status,
        );
        if !queued {
            let message = self.status.clone();
            self.submission.resolve_failure(message);
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn form_row(ui: &mut egui::Ui, id: &'static str, label: &str, hint: &str, value: &mut String) {
        ui.label(egui::RichText::new(label).strong());
        ui.add(
            egui::TextEdit::singleline(value)
                .id_salt(id)
                .hint_text(hint)
                .desired_width(f32::INFINITY),
        );
        ui.end_row();
    }

    fn form_section(
        ui: &mut egui::Ui,
        title: &str,
        grid_id: &'static str,
        rows: impl FnOnce(&mut egui::Ui),
    ) {
        egui::Frame::group(ui.style())
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(12, 10))
            .show(ui, |ui| {
                ui.label(egui::RichText::new(title).strong().size(15.0));
                ui.add_space(4.0);
                egui::Grid::new(grid_id)
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .min_col_width(170.0)
                    .show(ui, rows);
            });
        ui.add_space(8.0);
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let fields = &mut self.fields;

        Self::form_section(ui, "Location details", "grid_location", |ui| {
            Self::form_row(ui, "field_date", "Date (YYYY-MM-DD)", "2025-01-15", &mut fields.date);
            Self::form_row(ui, "field_street", "Street", "123 Main St", &mut fields.street);
            Self::form_row(ui, "field_city", "City", "Seattle", &mut fields.city);
            Self::form_row(ui, "field_statezip", "State and ZIP", "WA 98101", &mut fields.statezip);
            Self::form_row(ui, "field_zipcode", "ZIP code", "98101", &mut fields.zipcode);
            Self::form_row(ui, "field_lat", "Latitude", "47.6062", &mut fields.lat);
            Self::form_row(ui, "field_long", "Longitude", "-122.3321", &mut fields.long);
        });

        Self::form_section(ui, "Key characteristics", "grid_characteristics", |ui| {
            Self::form_row(ui, "field_sqft_living", "Living area (sqft)", "1800", &mut fields.sqft_living);
            Self::form_row(ui, "field_bedrooms", "Bedrooms", "3", &mut fields.bedrooms);
            Self::form_row(ui, "field_bathrooms", "Bathrooms (0.5 steps)", "2.5", &mut fields.bathrooms);
            Self::form_row(ui, "field_grade", "Build grade (1-13)", "7", &mut fields.grade);
            Self::form_row(ui, "field_floors", "Floors (0.5 steps)", "2", &mut fields.floors);
        });

        Self::form_section(ui, "Additional details", "grid_details", |ui| {
            Self::form_row(ui, "field_yr_built", "Year built", "2005", &mut fields.yr_built);

            ui.label(egui::RichText::new("Waterfront").strong());
            let selected = if fields.waterfront.trim() == "1" { "Yes" } else { "No" };
            egui::ComboBox::from_id_salt("field_waterfront")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut fields.waterfront, "0".to_string(), "No");
                    ui.selectable_value(&mut fields.waterfront, "1".to_string(), "Yes");
                });
            ui.end_row();

            Self::form_row(ui, "field_view", "View quality (0-4)", "0", &mut fields.view);
            Self::form_row(ui, "field_condition", "Condition (1-5)", "1", &mut fields.condition);
            Self::form_row(
                ui,
                "field_yr_renovated",
                "Year renovated (0 if never)",
                "0",
                &mut fields.yr_renovated,
            );
        });

        Self::form_section(ui, "Areas", "grid_areas", |ui| {
            Self::form_row(ui, "field_sqft_lot", "Lot size (sqft)", "6000", &mut fields.sqft_lot);
            Self::form_row(ui, "field_sqft_above", "Above-ground area (sqft)", "1500", &mut fields.sqft_above);
            Self::form_row(ui, "field_sqft_basement", "Basement area (sqft)", "300", &mut fields.sqft_basement);
        });
    }

    fn show_submit_row(&mut self, ui: &mut egui::Ui) {
        let in_flight = self.submission.is_in_flight();
        ui.horizontal(|ui| {
            let button = egui::Button::new(egui::RichText::new("Estimate price").strong())
                .min_size(egui::vec2(180.0, 36.0));
            if ui.add_enabled(!in_flight, button).clicked() {
                self.try_submit();
            }
        });
        ui.add_space(8.0);
    }

    fn show_result(&mut self, ui: &mut egui::Ui) {
        match ResultView::project(&self.submission) {
            ResultView::Empty => {}
            ResultView::Busy => {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Estimating price...");
                });
            }
            ResultView::Alert(message) => {
                egui::Frame::NONE
                    .fill(egui::Color32::from_rgb(111, 53, 53))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(12, 10))
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(egui::RichText::new("⚠").size(16.0));
                            ui.label(
                                egui::RichText::new(message).color(egui::Color32::WHITE),
                            );
                        });
                    });
            }
            ResultView::Price(formatted) => {
                egui::Frame::group(ui.style())
                    .corner_radius(10.0)
                    .inner_margin(egui::Margin::symmetric(16, 12))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new("Estimated price").strong().size(15.0));
                        ui.label(
                            egui::RichText::new(formatted)
                                .strong()
                                .size(28.0)
                                .color(egui::Color32::from_rgb(67, 181, 129)),
                        );
                        ui.small(
                            "Model-based estimate; actual prices vary with market conditions.",
                        );
                    });
            }
        }
    }
}

impl eframe::App for EstimatorApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings =
            PersistedEstimatorSettings::from_runtime(&self.server_url, self.request_timeout);
        if let Ok(text) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, text);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        if self.submission.is_in_flight() {
            // Worker events arrive on a channel; keep polling while one is due.
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("House Price Estimator");
            ui.weak("Estimate a property's value from its attributes.");
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Server URL").strong());
                ui.add(
                    egui::TextEdit::singleline(&mut self.server_url)
                        .id_salt("server_url")
                        .hint_text(DEFAULT_SERVER_URL)
                        .desired_width(320.0),
                );
            });
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
                ui.add_space(8.0);
                self.show_status_banner(ui);
                self.show_form(ui);
                self.show_submit_row(ui);
                self.show_result(ui);
                ui.add_space(12.0);
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::{UiError, UiErrorCategory};
    use crossbeam_channel::bounded;
    use shared::fields::Field;

    fn test_app() -> (
        EstimatorApp,
        Receiver<BackendCommand>,
        Sender<UiEvent>,
    ) {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(8);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
        let app = EstimatorApp::new(cmd_tx, ui_rx, None, StartupConfig::default());
        (app, cmd_rx, ui_tx)
    }

    #[test]
    fn formats_prices_as_grouped_us_dollars() {
        assert_eq!(format_usd(452000.5), "$452,000.50");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(999.99), "$999.99");
        assert_eq!(format_usd(1234567.0), "$1,234,567.00");
        assert_eq!(format_usd(-12.5), "-$12.50");
    }

    #[test]
    fn projection_is_a_pure_mapping_of_the_submission_state() {
        assert_eq!(ResultView::project(&SubmissionState::Idle), ResultView::Empty);
        assert_eq!(ResultView::project(&SubmissionState::InFlight), ResultView::Busy);
        assert_eq!(
            ResultView::project(&SubmissionState::Succeeded(452000.5)),
            ResultView::Price("$452,000.50".to_string())
        );
        assert_eq!(
            ResultView::project(&SubmissionState::Failed("no luck".to_string())),
            ResultView::Alert("no luck".to_string())
        );
    }

    #[test]
    fn submit_snapshots_the_form_and_queues_exactly_one_command() {
        let (mut app, cmd_rx, _ui_tx) = test_app();
        app.fields.set(Field::SqftLiving, "1200");
        app.fields.set(Field::Bedrooms, "3");

        app.try_submit();
        assert!(app.submission.is_in_flight());

        // Edits made while in flight must not touch the queued snapshot.
        app.fields.set(Field::Bedrooms, "4");

        let BackendCommand::Predict { request, .. } =
            cmd_rx.try_recv().expect("queued command");
        assert_eq!(request.sqft_living, Some(1200));
        assert_eq!(request.bedrooms, Some(3.0));
        assert_eq!(app.fields.get(Field::Bedrooms), "4");
    }

    #[test]
    fn resubmitting_while_in_flight_issues_no_second_command() {
        let (mut app, cmd_rx, _ui_tx) = test_app();
        app.try_submit();
        let _ = cmd_rx.try_recv().expect("first command");

        app.try_submit();
        assert!(cmd_rx.try_recv().is_err());
        assert!(app.submission.is_in_flight());
    }

    #[test]
    fn worker_events_resolve_the_submission() {
        let (mut app, _cmd_rx, ui_tx) = test_app();
        app.try_submit();
        ui_tx.send(UiEvent::PredictionReady(452000.5)).expect("send");
        app.process_ui_events();
        assert_eq!(app.submission.price(), Some(452000.5));

        app.try_submit();
        assert_eq!(app.submission.price(), None);
        ui_tx
            .send(UiEvent::PredictionFailed(UiError::new(
                UiErrorCategory::Service,
                "grade must be between 1 and 13",
            )))
            .expect("send");
        app.process_ui_events();
        assert_eq!(
            app.submission.failure(),
            Some("grade must be between 1 and 13")
        );
        assert!(app.status.contains("Service error"));
    }

    #[test]
    fn missing_server_url_blocks_the_submission_with_a_banner() {
        let (mut app, cmd_rx, _ui_tx) = test_app();
        app.server_url.clear();

        app.try_submit();
        assert!(!app.submission.is_in_flight());
        assert!(app.status_banner.is_some());
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn dispatch_failure_resolves_to_failed_instead_of_hanging_in_flight() {
        let (mut app, cmd_rx, _ui_tx) = test_app();
        drop(cmd_rx);

        app.try_submit();
        assert!(!app.submission.is_in_flight());
        assert!(app.submission.failure().is_some());
    }

    #[test]
    fn persisted_settings_round_trip_and_clamp() {
        let settings =
            PersistedEstimatorSettings::from_runtime("http://example.com", Duration::from_secs(45));
        let text = serde_json::to_string(&settings).expect("serialize");
        let decoded: PersistedEstimatorSettings =
            serde_json::from_str(&text).expect("deserialize");
        assert_eq!(decoded, settings);

        let (url, timeout) = PersistedEstimatorSettings {
            server_url: "http://example.com".to_string(),
            request_timeout_secs: 0,
        }
        .into_runtime();
        assert_eq!(url, "http://example.com");
        assert_eq!(timeout, Duration::from_secs(MIN_TIMEOUT_SECS));
    }
}
