//! Authentication middleware
//!
//! Two composable request gates: `require_session` verifies the session
//! cookie and attaches the claims, `require_role` (layered inside it)
//! enforces an exact role match. A failed check short-circuits the request;
//! there is no retry within a request.

use std::sync::Arc;

use axum::Json;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde_json::json;

use super::jwt::{JwtError, SessionClaims};
use super::service::AuthService;
use crate::core::constants::SESSION_COOKIE_NAME;
use crate::data::types::Role;

/// Authentication error response
#[derive(Debug)]
pub struct AuthGateError {
    pub status: StatusCode,
    pub error: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl AuthGateError {
    pub fn required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "AUTH_REQUIRED",
            message: "Authentication required".to_string(),
        }
    }

    pub fn expired() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "TOKEN_EXPIRED",
            message: "Session has expired".to_string(),
        }
    }

    pub fn invalid() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "TOKEN_INVALID",
            message: "Invalid session token".to_string(),
        }
    }

    pub fn forbidden(role: Role) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            error: "forbidden",
            code: "ROLE_REQUIRED",
            message: format!("This resource requires the '{}' role", role),
        }
    }
}

impl IntoResponse for AuthGateError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.error,
            "code": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Shared auth state for middleware
#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<AuthService>,
}

/// Session middleware
///
/// Extracts the session cookie, validates the token, and injects the
/// verified `SessionClaims` into request extensions for downstream use.
/// "No cookie" is rejected here, before any token verification runs.
pub async fn require_session(
    State(state): State<AuthState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthGateError> {
    let session_cookie = jar
        .get(SESSION_COOKIE_NAME)
        .ok_or_else(AuthGateError::required)?;

    let claims = state
        .auth
        .verify_session(session_cookie.value())
        .map_err(|e| match e {
            JwtError::Expired => AuthGateError::expired(),
            _ => AuthGateError::invalid(),
        })?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Role middleware, layered inside `require_session`
///
/// Rejects with 403 unless the attached claims carry exactly the required
/// role. Missing claims mean the session layer did not run; treat as
/// unauthenticated rather than leaking a 500.
pub async fn require_role(
    State(role): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, AuthGateError> {
    let claims = request
        .extensions()
        .get::<SessionClaims>()
        .ok_or_else(AuthGateError::required)?;

    if claims.role != role {
        return Err(AuthGateError::forbidden(role));
    }

    Ok(next.run(request).await)
}

/// Extractor for the verified session claims attached by `require_session`
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionClaims);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AuthGateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaims>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(AuthGateError::required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::allowlist::AirlineAllowlist;
    use crate::api::auth::jwt::create_session_token;
    use crate::core::config::AirlineEntryConfig;
    use crate::data::types::Plan;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use axum::routing::get;
    use sqlx::SqlitePool;
    use tower::ServiceExt;

    const TEST_SECRET: &str = "middleware-test-secret";

    async fn test_auth_service() -> Arc<AuthService> {
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
        Arc::new(AuthService::new(pool, allowlist, TEST_SECRET).unwrap())
    }

    async fn gated_router() -> (Router, Arc<AuthService>) {
        let auth = test_auth_service().await;
        let state = AuthState { auth: auth.clone() };

        async fn airline_handler(CurrentSession(claims): CurrentSession) -> Json<SessionClaims> {
            Json(claims)
        }

        let router = Router::new()
            .route("/airlines", get(airline_handler))
            .route_layer(axum::middleware::from_fn_with_state(
                Role::Airline,
                require_role,
            ))
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                require_session,
            ));
        (router, auth)
    }

    fn request_with_cookie(token: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .uri("/airlines")
            .header(header::COOKIE, format!("{}={}", SESSION_COOKIE_NAME, token))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_no_cookie_is_unauthorized() {
        let (router, _) = gated_router().await;
        let response = router
            .oneshot(
                HttpRequest::builder()
                    .uri("/airlines")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let (router, _) = gated_router().await;
        let response = router
            .oneshot(request_with_cookie("not-a-token"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let (router, auth) = gated_router().await;

        let (mut claims, _) = auth
            .login("ops@airline1.com", "AirlinePass#1")
            .await
            .unwrap();
        claims.iat -= 7200;
        claims.exp -= 7200;
        let stale = create_session_token(auth.signing_key(), &claims).unwrap();

        let response = router.oneshot(request_with_cookie(&stale)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_role_is_forbidden() {
        let (router, auth) = gated_router().await;

        // A valid passenger session must not pass the airline gate
        let passenger = crate::data::types::AccountRow {
            id: "acct_1".to_string(),
            full_name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            password_hash: String::new(),
            role: Role::Passenger,
            created_at: 0,
            updated_at: 0,
        };
        let claims = SessionClaims::for_account(&passenger);
        let token = create_session_token(auth.signing_key(), &claims).unwrap();

        let response = router.oneshot(request_with_cookie(&token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_matching_role_is_authorized() {
        let (router, auth) = gated_router().await;

        let (_, token) = auth
            .login("ops@airline1.com", "AirlinePass#1")
            .await
            .unwrap();

        let response = router.oneshot(request_with_cookie(&token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
