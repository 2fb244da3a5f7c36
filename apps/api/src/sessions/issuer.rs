use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use tracing::info;
use uuid::Uuid;

use crate::db::bounded;
use crate::errors::AppError;
use crate::sessions::store::SessionStore;

type HmacSha256 = Hmac<Sha256>;

/// Sessions live for 24 hours after issuance.
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const STORE: &str = "session store";
const KEY_PREFIX: &str = "session:";

/// Opaque bearer token handed to the browser in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for SessionToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Issues, resolves and revokes sessions.
///
/// The raw token is never stored: records are keyed by an HMAC of the token
/// under the session secret, so a leaked store cannot be replayed as cookies.
#[derive(Clone)]
pub struct SessionIssuer {
    store: Arc<dyn SessionStore>,
    secret: Arc<[u8]>,
    ttl: Duration,
    timeout: Duration,
}

impl SessionIssuer {
    pub fn new(store: Arc<dyn SessionStore>, secret: &str, timeout: Duration) -> Self {
        Self {
            store,
            secret: Arc::from(secret.as_bytes()),
            ttl: SESSION_TTL,
            timeout,
        }
    }

    /// Creates a session bound to `account_id`. Callers only pass ids of
    /// accounts they have just created or authenticated.
    pub async fn issue(&self, account_id: Uuid) -> Result<SessionToken, AppError> {
        let token = generate_token();
        let key = self.storage_key(&token)?;
        bounded(STORE, self.timeout, self.store.put(&key, account_id, self.ttl)).await?;
        info!(account_id = %account_id, "Issued session");
        Ok(SessionToken(token))
    }

    /// Invalidates the session immediately. Revoking twice is harmless.
    pub async fn revoke(&self, token: &SessionToken) -> Result<(), AppError> {
        let key = self.storage_key(token.as_str())?;
        bounded(STORE, self.timeout, self.store.delete(&key)).await?;
        info!("Revoked session");
        Ok(())
    }

    /// The account behind `token`, or `None` for anonymous, revoked or expired tokens.
    pub async fn resolve(&self, token: &SessionToken) -> Result<Option<Uuid>, AppError> {
        let key = self.storage_key(token.as_str())?;
        bounded(STORE, self.timeout, self.store.get(&key)).await
    }

    pub async fn is_ready(&self) -> bool {
        tokio::time::timeout(self.timeout, self.store.is_ready())
            .await
            .unwrap_or(false)
    }

    fn storage_key(&self, token: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::Internal(anyhow!("Invalid session secret: {e}")))?;
        mac.update(token.as_bytes());
        Ok(format!("{KEY_PREFIX}{}", hex::encode(mac.finalize().into_bytes())))
    }
}

/// 32 random bytes, hex encoded.
fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}
