//! Delay-prediction proxy
//!
//! The prediction model runs as a separate service; this client forwards a
//! structured flight-attribute record and hands the upstream JSON back
//! untouched. Nothing here interprets the estimate.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Prediction endpoint is not configured")]
    NotConfigured,

    #[error("Prediction request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Prediction endpoint returned status {0}")]
    UpstreamStatus(u16),
}

/// Flight attributes forwarded to the prediction model.
///
/// Field names keep the model service's wire format.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FlightFeatures {
    #[validate(range(min = 1987, max = 2100, message = "Year out of range"))]
    pub year: i32,
    #[validate(range(min = 1, max = 12, message = "Month must be 1-12"))]
    pub month: u8,
    #[validate(range(min = 1, max = 31, message = "Day must be 1-31"))]
    pub day: u8,
    #[validate(range(min = 1, max = 7, message = "Day of week must be 1-7"))]
    pub day_of_week: u8,
    #[validate(length(min = 1, max = 8, message = "Airline code required"))]
    pub airline: String,
    pub flight_number: u32,
    #[validate(length(min = 3, max = 5, message = "Origin airport code required"))]
    pub origin_airport: String,
    #[validate(length(min = 3, max = 5, message = "Destination airport code required"))]
    pub destination_airport: String,
    /// Departure times are encoded HHMM, e.g. 1730
    #[validate(range(max = 2359, message = "Scheduled departure must be HHMM"))]
    pub scheduled_departure: u16,
    #[validate(range(max = 2400, message = "Departure time must be HHMM"))]
    pub departure_time: u16,
    pub departure_delay: i32,
    pub taxi_out: i32,
    pub scheduled_time: i32,
    #[validate(range(min = 1, message = "Distance must be positive"))]
    pub distance: i32,
    #[validate(range(max = 2359, message = "Scheduled arrival must be HHMM"))]
    pub scheduled_arrival: u16,
}

/// HTTP client for the external prediction endpoint
pub struct PredictionService {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl PredictionService {
    pub fn new(endpoint: Option<String>, timeout_secs: u64) -> Result<Self, PredictionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Forward the flight record and return the upstream response verbatim
    pub async fn predict(
        &self,
        features: &FlightFeatures,
    ) -> Result<serde_json::Value, PredictionError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(PredictionError::NotConfigured)?;

        let response = self.client.post(endpoint).json(features).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Prediction endpoint error");
            return Err(PredictionError::UpstreamStatus(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}
