//! JWT session token handling

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::AirlineEntryConfig;
use crate::core::constants::SESSION_TTL_SECS;
use crate::data::types::{AccountRow, Plan, Role};

/// JWT validation error
#[derive(Debug)]
pub enum JwtError {
    /// Token has expired
    Expired,
    /// Token signature is invalid
    InvalidSignature,
    /// Other validation or encoding error
    Invalid(String),
}

impl fmt::Display for JwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "Session token has expired"),
            Self::InvalidSignature => write!(f, "Invalid session token signature"),
            Self::Invalid(msg) => write!(f, "Invalid session token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// JWT claims for session tokens
///
/// The token is the sole source of identity on each request; there is no
/// server-side session table. Airline sessions additionally carry the
/// entitlement fields from their allowlist entry.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Subject: account ID for passengers, allowlist email for airlines
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribed: Option<bool>,
}

impl SessionClaims {
    fn base(sub: String, role: Role) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(SESSION_TTL_SECS);

        Self {
            sub,
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            airline_id: None,
            airline_name: None,
            plan: None,
            subscribed: None,
        }
    }

    /// Claims for a credential-store account session
    pub fn for_account(account: &AccountRow) -> Self {
        Self::base(account.id.clone(), account.role)
    }

    /// Claims for a privileged allowlist identity (always airline role)
    pub fn for_airline(email: &str, entry: &AirlineEntryConfig) -> Self {
        let mut claims = Self::base(email.to_string(), Role::Airline);
        claims.airline_id = Some(entry.airline_id.clone());
        claims.airline_name = Some(entry.airline_name.clone());
        claims.plan = Some(entry.plan);
        claims.subscribed = Some(entry.plan.is_subscribed());
        claims
    }

    /// Get the subject ID from claims
    pub fn subject_id(&self) -> &str {
        &self.sub
    }
}

/// Create a signed JWT session token
pub fn create_session_token(signing_key: &[u8], claims: &SessionClaims) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| JwtError::Invalid(e.to_string()))
}

/// Validate and decode a JWT session token
pub fn validate_session_token(token: &str, signing_key: &[u8]) -> Result<SessionClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data =
        decode::<SessionClaims>(token, &DecodingKey::from_secret(signing_key), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Invalid(e.to_string()),
            })?;

    Ok(token_data.claims)
}
