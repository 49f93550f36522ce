//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::auth::SessionClaims;
use crate::api::routes::{auth, dashboards, health, predict};
use crate::data::types::{Plan, Role};
use crate::domain::prediction::FlightFeatures;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FlightLens API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Flight delay insight dashboard"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "dashboards", description = "Role-gated dashboard resources"),
        (name = "predict", description = "Delay-prediction proxy")
    ),
    paths(
        // Health
        health::health,
        // Auth
        auth::signup,
        auth::login,
        auth::logout,
        auth::check_auth,
        // Dashboards
        dashboards::passenger_hub,
        dashboards::airline_dashboard,
        // Prediction
        predict::predict_delay,
    ),
    components(schemas(
        // Shared
        Role,
        Plan,
        SessionClaims,
        // Health
        health::HealthResponse,
        // Auth
        auth::SignupRequest,
        auth::SignupResponse,
        auth::AccountDto,
        auth::LoginRequest,
        auth::LoginResponse,
        // Dashboards
        dashboards::PassengerHubResponse,
        dashboards::AirlineDashboardResponse,
        // Prediction
        FlightFeatures,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>FlightLens API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true
            });
        };
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        let paths = json["paths"].as_object().unwrap();
        assert!(paths.contains_key("/api/v1/auth/signup"));
        assert!(paths.contains_key("/api/v1/auth/login"));
        assert!(paths.contains_key("/api/v1/predict"));
    }
}
