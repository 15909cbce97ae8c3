//! Domain and wire types shared between the estimator UI and the prediction client.

pub mod fields;
pub mod protocol;

pub use fields::{Field, FieldSet};
pub use protocol::{ErrorBody, PredictionRequest, PredictionResponse};
