//! Authentication API endpoints
//!
//! The session travels as an HTTP-only, SameSite=Strict cookie whose max-age
//! equals the token TTL. Logout re-issues the cookie empty with zero max-age;
//! there is no server-side revocation, so a replayed token stays valid until
//! its expiry.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::auth::{
    AuthError, AuthService, AuthState, CurrentSession, SessionClaims, SignupInput, require_session,
};
use crate::api::types::ApiError;
use crate::core::constants::{SESSION_COOKIE_NAME, SESSION_TTL_SECS};
use crate::data::types::{AccountRow, Role};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Account as returned to clients. The password hash never leaves the server.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccountRow> for AccountDto {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            role: row.role,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_else(Utc::now),
            updated_at: DateTime::from_timestamp(row.updated_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    pub account: AccountDto,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub claims: SessionClaims,
    pub token: String,
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match &e {
            AuthError::MissingFields => Self::bad_request("MISSING_FIELDS", e.to_string()),
            AuthError::PasswordMismatch => Self::bad_request("PASSWORD_MISMATCH", e.to_string()),
            AuthError::WeakPassword => Self::bad_request("WEAK_PASSWORD", e.to_string()),
            AuthError::EmailExists => Self::conflict("EMAIL_EXISTS", e.to_string()),
            AuthError::InvalidCredentials => {
                Self::unauthorized("INVALID_CREDENTIALS", e.to_string())
            }
            AuthError::Config(_)
            | AuthError::Store(_)
            | AuthError::Password(_)
            | AuthError::Session(_) => {
                tracing::error!(error = %e, "Auth operation failed");
                Self::internal("Internal server error")
            }
        }
    }
}

/// Auth route state
#[derive(Clone)]
pub struct AuthRoutesState {
    pub auth: Arc<AuthService>,
    pub cookie_secure: bool,
}

/// Create auth routes
pub fn routes(auth: Arc<AuthService>, cookie_secure: bool) -> Router {
    let state = AuthRoutesState {
        auth: auth.clone(),
        cookie_secure,
    };

    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/check-auth", get(check_auth))
        .route("/me", get(check_auth))
        .route_layer(axum::middleware::from_fn_with_state(
            AuthState { auth },
            require_session,
        ))
        .with_state(state.clone());

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .with_state(state)
        .merge(protected)
}

fn session_cookie(state: &AuthRoutesState, token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.cookie_secure)
        .path("/")
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Register a new passenger account
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Missing fields, password mismatch, or weak password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(state): State<AuthRoutesState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let account = state
        .auth
        .signup(SignupInput {
            full_name: request.full_name,
            email: request.email,
            password: request.password,
            confirm_password: request.confirm_password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            account: account.into(),
        }),
    ))
}

/// Log in and receive a session cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthRoutesState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let (claims, token) = state.auth.login(&request.email, &request.password).await?;

    let cookie = session_cookie(&state, token.clone(), SESSION_TTL_SECS);

    Ok((jar.add(cookie), Json(LoginResponse { claims, token })))
}

/// Logout - clear the session cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out successfully"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout(
    State(state): State<AuthRoutesState>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    let cookie = session_cookie(&state, String::new(), 0);

    (
        jar.remove(cookie),
        Json(serde_json::json!({
            "success": true,
            "message": "Logged out successfully"
        })),
    )
}

/// Return the verified session claims for client rehydration
#[utoipa::path(
    get,
    path = "/api/v1/auth/check-auth",
    tag = "auth",
    responses(
        (status = 200, description = "Current session claims", body = SessionClaims),
        (status = 401, description = "No valid session")
    )
)]
pub async fn check_auth(CurrentSession(claims): CurrentSession) -> Json<SessionClaims> {
    Json(claims)
}
