use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::{connect_with_retry, CONNECT_ATTEMPTS, CONNECT_RETRY_DELAY};
use crate::errors::AppError;

/// Server-side session records keyed by an opaque storage key.
/// Entries must disappear on their own once `ttl` elapses.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn put(&self, key: &str, account_id: Uuid, ttl: Duration) -> Result<(), AppError>;

    async fn get(&self, key: &str) -> Result<Option<Uuid>, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;

    async fn is_ready(&self) -> bool;
}

/// Redis-backed sessions. Expiry is delegated to Redis via `SET ... EX`.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        info!("Connecting to Redis...");
        let client = redis::Client::open(redis_url)?;
        let conn = connect_with_retry("Redis", CONNECT_ATTEMPTS, CONNECT_RETRY_DELAY, || {
            client.get_multiplexed_async_connection()
        })
        .await?;
        info!("Redis session store connected");
        Ok(Self { conn })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, key: &str, account_id: Uuid, ttl: Duration) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(account_id.to_string())
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Uuid>, AppError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await?;

        Ok(value.and_then(|raw| match Uuid::parse_str(&raw) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Ignoring session record with malformed account id: {e}");
                None
            }
        }))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(key)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .is_ok()
    }
}
