use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::account::AccountRow;

/// Fields for a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub number: Option<String>,
}

/// Durable account storage. Implement this to swap backends without touching
/// the account store or the handlers.
///
/// `insert` must reject a second account with the same email with
/// `AppError::DuplicateEmail`; a lookup before inserting is not enough on its own.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRow>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRow>, AppError>;

    async fn insert(&self, account: NewAccount) -> Result<AccountRow, AppError>;

    /// Whether the backing store currently answers queries.
    async fn is_ready(&self) -> bool;
}

/// PostgreSQL-backed repository. Uniqueness comes from `accounts_email_key`.
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRow>, AppError> {
        Ok(
            sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRow>, AppError> {
        Ok(
            sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert(&self, account: NewAccount) -> Result<AccountRow, AppError> {
        let result = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (id, name, email, password_hash, number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.number)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(err) if is_unique_violation(&err) => Err(AppError::DuplicateEmail),
            Err(err) => Err(err.into()),
        }
    }

    async fn is_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

/// Postgres SQLSTATE 23505: unique_violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
