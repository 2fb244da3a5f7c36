use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use crate::errors::AppError;
use crate::sessions::store::SessionStore;

/// In-memory sessions for tests. Uses tokio's clock so paused-time tests can
/// run expiry forward.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, (Uuid, Instant)>>,
    unavailable: AtomicBool,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn keys(&self) -> Vec<String> {
        self.entries.lock().await.keys().cloned().collect()
    }

    fn gate(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::ServiceUnavailable(
                "session store offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, key: &str, account_id: Uuid, ttl: Duration) -> Result<(), AppError> {
        self.gate()?;
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (account_id, Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Uuid>, AppError> {
        self.gate()?;
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((id, expires_at)) if *expires_at > Instant::now() => Ok(Some(*id)),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.gate()?;
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst)
    }
}
