use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use crate::accounts::password::{hash_in_background, verify_in_background};
use crate::accounts::repository::{AccountRepository, NewAccount};
use crate::accounts::validation::{normalize_email, validate_registration};
use crate::db::bounded;
use crate::errors::AppError;
use crate::models::account::AccountRow;

const STORE: &str = "account store";

/// Account lifecycle: create accounts and check credentials.
///
/// Holds the repository as `Arc<dyn AccountRepository>`; every repository call
/// is bounded by `timeout`.
#[derive(Clone)]
pub struct AccountStore {
    repo: Arc<dyn AccountRepository>,
    timeout: Duration,
}

impl AccountStore {
    pub fn new(repo: Arc<dyn AccountRepository>, timeout: Duration) -> Self {
        Self { repo, timeout }
    }

    /// Creates an account and returns its id.
    ///
    /// Validation runs before any store access. The email lookup only spares
    /// a hash on the common duplicate path; the unique index settles races.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        number: &str,
    ) -> Result<Uuid, AppError> {
        validate_registration(name, email, password, number)?;
        let email = normalize_email(email);

        if bounded(STORE, self.timeout, self.repo.find_by_email(&email))
            .await?
            .is_some()
        {
            info!(email = %email, "Registration refused: email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash_in_background(password.to_string()).await?;
        let account = bounded(
            STORE,
            self.timeout,
            self.repo.insert(NewAccount {
                id: Uuid::new_v4(),
                name: name.trim().to_string(),
                email,
                password_hash,
                number: Some(number.trim().to_string()),
            }),
        )
        .await?;

        info!(account_id = %account.id, email = %account.email, "Registered account");
        Ok(account.id)
    }

    /// Returns the account id when `password` matches the stored hash.
    /// Unknown email and wrong password fail identically.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Uuid, AppError> {
        let email = normalize_email(email);
        let account = bounded(STORE, self.timeout, self.repo.find_by_email(&email)).await?;

        let stored_hash = account.as_ref().map(|a| a.password_hash.clone());
        let matched = verify_in_background(password.to_string(), stored_hash).await?;

        match account {
            Some(account) if matched => {
                info!(account_id = %account.id, "Authenticated account");
                Ok(account.id)
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<AccountRow>, AppError> {
        bounded(STORE, self.timeout, self.repo.find_by_id(id)).await
    }

    pub async fn is_ready(&self) -> bool {
        tokio::time::timeout(self.timeout, self.repo.is_ready())
            .await
            .unwrap_or(false)
    }
}
