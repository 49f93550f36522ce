//! Delay-prediction proxy endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::domain::prediction::{FlightFeatures, PredictionError, PredictionService};

/// Shared state for the prediction endpoint
#[derive(Clone)]
pub struct PredictApiState {
    pub prediction: Arc<PredictionService>,
}

/// Build the prediction router (session gating is layered by the server)
pub fn routes(prediction: Arc<PredictionService>) -> Router {
    let state = PredictApiState { prediction };

    Router::new()
        .route("/predict", post(predict_delay))
        .with_state(state)
}

impl From<PredictionError> for ApiError {
    fn from(e: PredictionError) -> Self {
        match &e {
            PredictionError::NotConfigured => {
                Self::service_unavailable("Prediction service is not configured")
            }
            PredictionError::Upstream(_) | PredictionError::UpstreamStatus(_) => {
                tracing::error!(error = %e, "Prediction proxy failed");
                Self::service_unavailable("Prediction service is unavailable")
            }
        }
    }
}

/// Forward flight attributes to the delay-prediction model
///
/// The upstream estimate is passed through without interpretation.
#[utoipa::path(
    post,
    path = "/api/v1/predict",
    tag = "predict",
    request_body = FlightFeatures,
    responses(
        (status = 200, description = "Upstream prediction response"),
        (status = 400, description = "Invalid flight attributes"),
        (status = 401, description = "No valid session"),
        (status = 503, description = "Prediction service unavailable")
    )
)]
pub async fn predict_delay(
    State(state): State<PredictApiState>,
    ValidatedJson(features): ValidatedJson<FlightFeatures>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let estimate = state.prediction.predict(&features).await?;
    Ok(Json(estimate))
}
