use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::accounts::repository::{AccountRepository, NewAccount};
use crate::errors::AppError;
use crate::models::account::AccountRow;

/// In-memory repository for tests. Enforces email uniqueness on insert the
/// same way the database index does, and can simulate outages.
#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: RwLock<Vec<AccountRow>>,
    unavailable: AtomicBool,
    stalled: AtomicBool,
    stale_lookups: AtomicBool,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails the way a dropped pool does.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Every call hangs forever.
    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    /// Email lookups miss, as if a concurrent insert landed right after them.
    pub fn set_stale_lookups(&self, stale: bool) {
        self.stale_lookups.store(stale, Ordering::SeqCst);
    }

    pub async fn all(&self) -> Vec<AccountRow> {
        self.accounts.read().await.clone()
    }

    async fn gate(&self) -> Result<(), AppError> {
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRow>, AppError> {
        self.gate().await?;
        if self.stale_lookups.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRow>, AppError> {
        self.gate().await?;
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<AccountRow, AppError> {
        self.gate().await?;
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AppError::DuplicateEmail);
        }
        let row = AccountRow {
            id: account.id,
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            number: account.number,
            created_at: Utc::now(),
        };
        accounts.push(row.clone());
        Ok(row)
    }

    async fn is_ready(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst) && !self.stalled.load(Ordering::SeqCst)
    }
}
