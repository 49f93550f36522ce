//! Role-gated dashboard resources
//!
//! One resource per dashboard view: passengers see their hub, airlines see
//! their dashboard with the entitlement flags carried in the session claims.

use axum::{Json, Router, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::auth::{AuthState, CurrentSession, require_role, require_session};
use crate::data::types::{Plan, Role};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PassengerHubResponse {
    pub message: &'static str,
    pub subject_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AirlineDashboardResponse {
    pub message: &'static str,
    pub airline_id: Option<String>,
    pub airline_name: Option<String>,
    pub plan: Option<Plan>,
    pub subscribed: bool,
}

/// Build the dashboard routes with their role gates
///
/// Each resource requires a session plus an exact role match; the session
/// layer is outermost so it always runs first.
pub fn routes(auth_state: AuthState) -> Router {
    let passengers = Router::new()
        .route("/passengers", get(passenger_hub))
        .route_layer(axum::middleware::from_fn_with_state(
            Role::Passenger,
            require_role,
        ));

    let airlines = Router::new()
        .route("/airlines", get(airline_dashboard))
        .route_layer(axum::middleware::from_fn_with_state(
            Role::Airline,
            require_role,
        ));

    passengers
        .merge(airlines)
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            require_session,
        ))
}

/// Passenger hub
#[utoipa::path(
    get,
    path = "/api/v1/passengers",
    tag = "dashboards",
    responses(
        (status = 200, description = "Passenger hub", body = PassengerHubResponse),
        (status = 401, description = "No valid session"),
        (status = 403, description = "Session is not passenger-role")
    )
)]
pub async fn passenger_hub(CurrentSession(claims): CurrentSession) -> Json<PassengerHubResponse> {
    Json(PassengerHubResponse {
        message: "Passenger hub",
        subject_id: claims.sub,
    })
}

/// Airline dashboard with entitlement passthrough
#[utoipa::path(
    get,
    path = "/api/v1/airlines",
    tag = "dashboards",
    responses(
        (status = 200, description = "Airline dashboard", body = AirlineDashboardResponse),
        (status = 401, description = "No valid session"),
        (status = 403, description = "Session is not airline-role")
    )
)]
pub async fn airline_dashboard(
    CurrentSession(claims): CurrentSession,
) -> Json<AirlineDashboardResponse> {
    Json(AirlineDashboardResponse {
        message: "Airline dashboard",
        airline_id: claims.airline_id,
        airline_name: claims.airline_name,
        plan: claims.plan,
        subscribed: claims.subscribed.unwrap_or(false),
    })
}
