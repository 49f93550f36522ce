//! Account repository for SQLite operations
//!
//! The email column carries a unique constraint; the service layer's
//! duplicate pre-check is advisory only, so a concurrent signup losing the
//! race surfaces here as `SqliteError::Conflict`.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{AccountRow, Role};

type AccountTuple = (String, String, String, String, String, i64, i64);

fn row_to_account(
    (id, full_name, email, password_hash, role, created_at, updated_at): AccountTuple,
) -> AccountRow {
    AccountRow {
        id,
        full_name,
        email,
        password_hash,
        role: Role::parse(&role),
        created_at,
        updated_at,
    }
}

/// Create a new account with a generated CUID2 ID
///
/// Expects `email` already normalized (trimmed, lowercased) by the caller.
pub async fn create_account(
    pool: &SqlitePool,
    full_name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<AccountRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO accounts (id, full_name, email, password_hash, role, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(full_name)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await;

    if let Err(e) = result {
        if let sqlx::Error::Database(dbe) = &e
            && matches!(dbe.kind(), sqlx::error::ErrorKind::UniqueViolation)
        {
            return Err(SqliteError::Conflict(format!(
                "account email already registered: {}",
                email
            )));
        }
        return Err(e.into());
    }

    Ok(AccountRow {
        id,
        full_name: full_name.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        role,
        created_at: now,
        updated_at: now,
    })
}

/// Get an account by normalized email
pub async fn get_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<AccountRow>, SqliteError> {
    let row = sqlx::query_as::<_, AccountTuple>(
        "SELECT id, full_name, email, password_hash, role, created_at, updated_at \
         FROM accounts WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_account))
}

/// Get an account by ID
pub async fn get_account(pool: &SqlitePool, id: &str) -> Result<Option<AccountRow>, SqliteError> {
    let row = sqlx::query_as::<_, AccountTuple>(
        "SELECT id, full_name, email, password_hash, role, created_at, updated_at \
         FROM accounts WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_account))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_pool() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_create_account() {
        let pool = setup_test_pool().await;
        let account = create_account(
            &pool,
            "Jane Doe",
            "jane@x.com",
            "$argon2id$fake",
            Role::Passenger,
        )
        .await
        .unwrap();

        assert!(!account.id.is_empty());
        assert_eq!(account.full_name, "Jane Doe");
        assert_eq!(account.email, "jane@x.com");
        assert_eq!(account.role, Role::Passenger);
        assert_eq!(account.created_at, account.updated_at);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = setup_test_pool().await;
        create_account(&pool, "Jane", "jane@x.com", "h1", Role::Passenger)
            .await
            .unwrap();

        let err = create_account(&pool, "Other Jane", "jane@x.com", "h2", Role::Passenger)
            .await
            .unwrap_err();
        assert!(err.is_conflict(), "expected conflict, got: {err}");
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let pool = setup_test_pool().await;
        create_account(&pool, "Jane", "jane@x.com", "h1", Role::Passenger)
            .await
            .unwrap();

        let fetched = get_by_email(&pool, "jane@x.com").await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().full_name, "Jane");

        let missing = get_by_email(&pool, "nobody@x.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_account_by_id() {
        let pool = setup_test_pool().await;
        let created = create_account(&pool, "Jane", "jane@x.com", "h1", Role::Passenger)
            .await
            .unwrap();

        let fetched = get_account(&pool, &created.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "jane@x.com");
    }

    #[tokio::test]
    async fn test_role_round_trips_through_store() {
        let pool = setup_test_pool().await;
        create_account(&pool, "Ops", "ops@y.com", "h1", Role::Admin)
            .await
            .unwrap();

        let fetched = get_by_email(&pool, "ops@y.com").await.unwrap().unwrap();
        assert_eq!(fetched.role, Role::Admin);
    }
}
