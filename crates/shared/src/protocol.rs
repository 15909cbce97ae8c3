//! Wire schemas for the prediction service exchange.
//!
//! The request is a flat JSON object with the exact key set the service
//! expects. Numeric slots that fail to coerce serialize as `null` — the
//! payload is sent best-effort and range/type rejection is left to the
//! service, which answers with a `detail` message.

use serde::{Deserialize, Serialize};

use crate::fields::FieldSet;

/// Coerced prediction payload. Field order matches the wire object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub date: String,
    pub street: String,
    pub city: String,
    pub statezip: String,
    pub sqft_living: Option<i64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub grade: Option<i64>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub yr_built: Option<i64>,
    pub waterfront: Option<i64>,
    pub view: Option<i64>,
    pub condition: Option<i64>,
    pub floors: Option<f64>,
    pub zipcode: String,
    pub yr_renovated: Option<i64>,
    pub sqft_lot: Option<i64>,
    pub sqft_above: Option<i64>,
    pub sqft_basement: Option<i64>,
}

impl PredictionRequest {
    /// Builds the payload from a snapshot of the form store. Never fails:
    /// unparsable numeric text becomes `None` (`null` on the wire).
    pub fn from_fields(fields: &FieldSet) -> Self {
        Self {
            date: fields.date.clone(),
            street: fields.street.clone(),
            city: fields.city.clone(),
            statezip: fields.statezip.clone(),
            sqft_living: coerce_int(&fields.sqft_living),
            bedrooms: coerce_float(&fields.bedrooms),
            bathrooms: coerce_float(&fields.bathrooms),
            grade: coerce_int(&fields.grade),
            lat: coerce_float(&fields.lat),
            long: coerce_float(&fields.long),
            yr_built: coerce_int(&fields.yr_built),
            waterfront: coerce_int(&fields.waterfront),
            view: coerce_int(&fields.view),
            condition: coerce_int(&fields.condition),
            floors: coerce_float(&fields.floors),
            zipcode: fields.zipcode.clone(),
            yr_renovated: coerce_int(&fields.yr_renovated),
            sqft_lot: coerce_int(&fields.sqft_lot),
            sqft_above: coerce_int(&fields.sqft_above),
            sqft_basement: coerce_int(&fields.sqft_basement),
        }
    }
}

/// Integer coercion: strict parse first, then truncating float parse so
/// decimal text like "1200.0" still yields 1200.
fn coerce_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.trunc() as i64)
}

/// Float coercion: finite values only.
fn coerce_float(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Success body. Decoding is fail-closed: a body without a numeric
/// `predicted_price` is treated as malformed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_price: f64,
}

/// Failure body. `detail`, when present, is shown to the user verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
