//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;

use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::auth::{AuthService, AuthState, require_session};
use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{auth, dashboards, health, predict};
use crate::core::CoreApp;
use crate::core::constants::{AUTH_BODY_LIMIT, DEFAULT_BODY_LIMIT};
use crate::domain::PredictionService;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);

        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        // Clone shutdown before moving app
        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let router = build_router(
            app.auth.clone(),
            app.prediction.clone(),
            app.config.auth.cookie_secure,
            &allowed_origins,
        );

        let router = if app.config.debug {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        };

        let listener = TcpListener::bind(addr).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Assemble the full application router
pub(crate) fn build_router(
    auth: Arc<AuthService>,
    prediction: Arc<PredictionService>,
    cookie_secure: bool,
    allowed_origins: &AllowedOrigins,
) -> Router {
    let auth_state = AuthState { auth: auth.clone() };

    let auth_routes =
        auth::routes(auth, cookie_secure).layer(DefaultBodyLimit::max(AUTH_BODY_LIMIT));

    let v1_routes = dashboards::routes(auth_state.clone()).merge(
        predict::routes(prediction).route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            require_session,
        )),
    );

    Router::new()
        .route("/api/v1/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .route("/api/docs/", get(swagger_ui_html))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1", v1_routes)
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors(allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::AirlineAllowlist;
    use crate::core::config::AirlineEntryConfig;
    use crate::core::constants::SESSION_COOKIE_NAME;
    use crate::data::types::Plan;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use sqlx::SqlitePool;
    use tower::ServiceExt;

    async fn full_router() -> Router {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();

        let allowlist = AirlineAllowlist::from_entries(&[AirlineEntryConfig {
            email: "ops@airline1.com".to_string(),
            password: "AirlinePass#1".to_string(),
            airline_id: "airline1".to_string(),
            airline_name: "Airline One".to_string(),
            plan: Plan::Subscribed,
        }]);
        let auth = Arc::new(AuthService::new(pool, allowlist, "server-test-secret").unwrap());
        let prediction = Arc::new(PredictionService::new(None, 1).unwrap());
        let origins = AllowedOrigins::new("127.0.0.1", 5170);

        build_router(auth, prediction, false, &origins)
    }

    async fn login_token(router: &Router, email: &str, password: &str) -> String {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "email": email, "password": password }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    fn get_with_cookie(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(
                header::COOKIE,
                format!("{}={}", SESSION_COOKIE_NAME, token),
            )
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let router = full_router().await;
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dashboards_require_session() {
        let router = full_router().await;
        for uri in ["/api/v1/passengers", "/api/v1/airlines", "/api/v1/predict"] {
            let request = if uri.ends_with("predict") {
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap()
            } else {
                Request::builder().uri(uri).body(Body::empty()).unwrap()
            };
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn test_airline_session_reaches_airline_dashboard() {
        let router = full_router().await;
        let token = login_token(&router, "ops@airline1.com", "AirlinePass#1").await;

        let response = router
            .clone()
            .oneshot(get_with_cookie("/api/v1/airlines", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["airlineId"], "airline1");
        assert_eq!(body["subscribed"], true);

        // Same session is rejected by the passenger gate
        let response = router
            .oneshot(get_with_cookie("/api/v1/passengers", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let router = full_router().await;
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
