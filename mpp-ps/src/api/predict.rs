//! Prediction endpoint
//!
//! Accepts one set of river readings and returns the point estimate of
//! microplastic concentration. The handler is a thin adapter: field names
//! and ordering live in [`FeatureRecord`], the math lives in the pipeline.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::debug;

use mpp_common::FeatureRecord;

use crate::error::ApiResult;
use crate::AppState;

/// Unit of every concentration estimate this service produces
const UNIT: &str = "particles/L";

/// Prediction response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Estimated microplastic concentration (unrounded; display rounding
    /// is the client's choice)
    pub concentration: f64,
    pub unit: String,
}

/// POST /api/predict
///
/// Body: JSON object with the five readings by name (`temperature`, `ph`,
/// `dissolved_oxygen`, `conductivity`, `turbidity`). A missing or
/// non-numeric field is rejected at deserialization; scaling and scoring
/// failures map to 422 with an error envelope.
pub async fn predict(
    State(state): State<AppState>,
    Json(record): Json<FeatureRecord>,
) -> ApiResult<Json<PredictResponse>> {
    let concentration = state.pipeline.predict(&record)?;
    debug!("Predicted {:.2} {} for {:?}", concentration, UNIT, record);

    Ok(Json(PredictResponse {
        concentration,
        unit: UNIT.to_string(),
    }))
}
