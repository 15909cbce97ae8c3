//! UI layer: the estimator app shell, form sections, and result views.

pub mod app;

pub use app::{EstimatorApp, PersistedEstimatorSettings, StartupConfig, SETTINGS_STORAGE_KEY};
