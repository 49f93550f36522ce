//! Authentication service
//!
//! Orchestrates signup and login over the credential store and the airline
//! allowlist, and owns the session signing key. Every operation returns a
//! tagged result; the HTTP boundary translates each variant to a status code.

use sqlx::SqlitePool;
use thiserror::Error;

use super::allowlist::{AirlineAllowlist, normalize_email};
use super::jwt::{JwtError, SessionClaims, create_session_token, validate_session_token};
use super::password::{PasswordError, hash_password, verify_password};
use crate::core::constants::MIN_PASSWORD_LEN;
use crate::data::sqlite::SqliteError;
use crate::data::sqlite::repositories::account;
use crate::data::types::{AccountRow, Role};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 8 characters")]
    WeakPassword,

    #[error("An account with this email already exists")]
    EmailExists,

    /// Identical for unknown email and wrong password, so a caller cannot
    /// enumerate registered accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Auth configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] SqliteError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Session(#[from] JwtError),
}

/// Normalized signup request
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Main authentication service
pub struct AuthService {
    pool: SqlitePool,
    allowlist: AirlineAllowlist,
    signing_key: Vec<u8>,
}

impl AuthService {
    /// Create the service
    ///
    /// Fails when the signing secret is empty; sessions must never be signed
    /// with a default key.
    pub fn new(
        pool: SqlitePool,
        allowlist: AirlineAllowlist,
        session_secret: &str,
    ) -> Result<Self, AuthError> {
        if session_secret.is_empty() {
            return Err(AuthError::Config(
                "session signing secret is not configured".to_string(),
            ));
        }

        Ok(Self {
            pool,
            allowlist,
            signing_key: session_secret.as_bytes().to_vec(),
        })
    }

    pub fn signing_key(&self) -> &[u8] {
        &self.signing_key
    }

    /// Register a new passenger account
    ///
    /// Validation runs before any store access; the duplicate pre-check is
    /// advisory and the store's unique index is the final arbiter.
    pub async fn signup(&self, input: SignupInput) -> Result<AccountRow, AuthError> {
        let full_name = input.full_name.trim().to_string();
        let email = normalize_email(&input.email);

        if full_name.is_empty()
            || email.is_empty()
            || input.password.is_empty()
            || input.confirm_password.is_empty()
        {
            return Err(AuthError::MissingFields);
        }
        if input.password != input.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        if account::get_by_email(&self.pool, &email).await?.is_some() {
            return Err(AuthError::EmailExists);
        }

        let password_hash = hash_password(&input.password)?;

        // Role is forced here; the signup caller never chooses it
        match account::create_account(&self.pool, &full_name, &email, &password_hash, Role::Passenger)
            .await
        {
            Ok(created) => {
                tracing::debug!(account_id = %created.id, "Account created");
                Ok(created)
            }
            // A concurrent signup can win the race past the pre-check
            Err(e) if e.is_conflict() => Err(AuthError::EmailExists),
            Err(e) => Err(e.into()),
        }
    }

    /// Authenticate and issue a session token
    ///
    /// The allowlist is consulted first: an exact email + password match
    /// issues an airline session and never touches the credential store.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(SessionClaims, String), AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        if let Some(entry) = self.allowlist.authenticate(&email, password) {
            let claims = SessionClaims::for_airline(&email, entry);
            let token = create_session_token(&self.signing_key, &claims)?;
            tracing::debug!(airline_id = %entry.airline_id, "Airline login");
            return Ok((claims, token));
        }

        let Some(stored) = account::get_by_email(&self.pool, &email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &stored.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let claims = SessionClaims::for_account(&stored);
        let token = create_session_token(&self.signing_key, &claims)?;
        tracing::debug!(account_id = %stored.id, "Account login");
        Ok((claims, token))
    }

    /// Validate a session token
    pub fn verify_session(&self, token: &str) -> Result<SessionClaims, JwtError> {
        validate_session_token(token, &self.signing_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AirlineEntryConfig;
    use crate::data::types::Plan;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    fn allowlist() -> AirlineAllowlist {
        AirlineAllowlist::from_entries(&[AirlineEntryConfig {
            email: "ops@airline1.com".to_string(),
            password: "AirlinePass#1".to_string(),
            airline_id: "airline1".to_string(),
            airline_name: "Airline One".to_string(),
            plan: Plan::Subscribed,
        }])
    }

    async fn setup_service() -> AuthService {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        AuthService::new(pool, allowlist(), TEST_SECRET).unwrap()
    }

    fn signup_input(email: &str) -> SignupInput {
        SignupInput {
            full_name: "Jane Doe".to_string(),
            email: email.to_string(),
            password: "longenough1".to_string(),
            confirm_password: "longenough1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_secret_is_config_error() {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        let result = AuthService::new(pool, AirlineAllowlist::default(), "");
        assert!(matches!(result, Err(AuthError::Config(_))));
    }

    #[tokio::test]
    async fn test_signup_creates_passenger_account() {
        let service = setup_service().await;
        let account = service.signup(signup_input("JANE@x.com")).await.unwrap();

        assert_eq!(account.email, "jane@x.com");
        assert_eq!(account.role, Role::Passenger);
        assert_eq!(account.full_name, "Jane Doe");
        assert!(account.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_signup_missing_fields() {
        let service = setup_service().await;
        let mut input = signup_input("jane@x.com");
        input.full_name = "   ".to_string();

        assert!(matches!(
            service.signup(input).await,
            Err(AuthError::MissingFields)
        ));
    }

    #[tokio::test]
    async fn test_signup_password_mismatch() {
        let service = setup_service().await;
        let mut input = signup_input("jane@x.com");
        input.confirm_password = "longenough2".to_string();

        assert!(matches!(
            service.signup(input).await,
            Err(AuthError::PasswordMismatch)
        ));
    }

    #[tokio::test]
    async fn test_signup_weak_password() {
        let service = setup_service().await;
        let mut input = signup_input("jane@x.com");
        input.password = "short".to_string();
        input.confirm_password = "short".to_string();

        assert!(matches!(
            service.signup(input).await,
            Err(AuthError::WeakPassword)
        ));
    }

    #[tokio::test]
    async fn test_signup_duplicate_email_case_insensitive() {
        let service = setup_service().await;
        service.signup(signup_input("jane@x.com")).await.unwrap();

        // Same email with different case and a different password
        let mut input = signup_input("Jane@X.COM");
        input.password = "another-long-pass".to_string();
        input.confirm_password = "another-long-pass".to_string();

        assert!(matches!(
            service.signup(input).await,
            Err(AuthError::EmailExists)
        ));
    }

    #[tokio::test]
    async fn test_login_account_success() {
        let service = setup_service().await;
        service.signup(signup_input("jane@x.com")).await.unwrap();

        let (claims, token) = service.login("JANE@x.com ", "longenough1").await.unwrap();
        assert_eq!(claims.role, Role::Passenger);
        assert!(claims.airline_id.is_none());

        let verified = service.verify_session(&token).unwrap();
        assert_eq!(verified.sub, claims.sub);
    }

    #[tokio::test]
    async fn test_login_missing_fields() {
        let service = setup_service().await;
        assert!(matches!(
            service.login("", "pw").await,
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            service.login("jane@x.com", "").await,
            Err(AuthError::MissingFields)
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_are_identical() {
        let service = setup_service().await;
        service.signup(signup_input("jane@x.com")).await.unwrap();

        let unknown = service.login("nobody@x.com", "longenough1").await;
        let wrong = service.login("jane@x.com", "wrong-password").await;

        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_allowlist_login_issues_airline_session() {
        let service = setup_service().await;

        let (claims, _token) = service
            .login("ops@airline1.com", "AirlinePass#1")
            .await
            .unwrap();

        assert_eq!(claims.role, Role::Airline);
        assert_eq!(claims.airline_id.as_deref(), Some("airline1"));
        assert_eq!(claims.plan, Some(Plan::Subscribed));
        assert_eq!(claims.subscribed, Some(true));
    }

    #[tokio::test]
    async fn test_allowlist_checked_before_credential_store() {
        let service = setup_service().await;

        // An account with the allowlist email but a different password must
        // not shadow the allowlist path.
        let mut input = signup_input("ops@airline1.com");
        input.password = "store-password-1".to_string();
        input.confirm_password = "store-password-1".to_string();
        service.signup(input).await.unwrap();

        let (claims, _) = service
            .login("ops@airline1.com", "AirlinePass#1")
            .await
            .unwrap();
        assert_eq!(claims.role, Role::Airline);
        assert_eq!(claims.sub, "ops@airline1.com");

        // The store password still resolves through the credential store
        let (claims, _) = service
            .login("ops@airline1.com", "store-password-1")
            .await
            .unwrap();
        assert_eq!(claims.role, Role::Passenger);
    }
}
