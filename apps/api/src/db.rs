use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::errors::AppError;

/// Startup connection policy for every backing store.
pub const CONNECT_ATTEMPTS: u32 = 5;
pub const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Creates the PostgreSQL pool and applies pending migrations.
pub async fn create_pool(database_url: &str, acquire_timeout: Duration) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = connect_with_retry("PostgreSQL", CONNECT_ATTEMPTS, CONNECT_RETRY_DELAY, || {
        PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
    })
    .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Runs `connect` until it succeeds, sleeping a fixed `delay` between attempts.
/// Gives up after `attempts` tries with the last error.
pub async fn connect_with_retry<T, E, F, Fut>(
    label: &str,
    attempts: u32,
    delay: Duration,
    mut connect: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut attempt = 1;
    loop {
        match connect().await {
            Ok(conn) => return Ok(conn),
            Err(e) if attempt < attempts => {
                warn!(
                    "{label} connection attempt {attempt}/{attempts} failed: {e}, retrying in {}s",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Could not connect to {label} after {attempts} attempts")
                })
            }
        }
    }
}

/// Bounds a single store call. A store that does not answer in time is
/// reported as unavailable instead of holding the request open.
pub async fn bounded<T, Fut>(store: &str, timeout: Duration, call: Fut) -> Result<T, AppError>
where
    Fut: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(timeout, call).await.map_err(|_| {
        AppError::ServiceUnavailable(format!(
            "{store} did not respond within {}ms",
            timeout.as_millis()
        ))
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, thiserror::Error)]
    #[error("refused")]
    struct Refused;

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = connect_with_retry("test", 5, Duration::from_secs(5), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(Refused)
                } else {
                    Ok("connected")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "connected");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();
        let result: Result<()> = connect_with_retry("test", 5, Duration::from_secs(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Refused) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        // Four sleeps between five attempts.
        assert!(started.elapsed() >= Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_call_times_out_as_unavailable() {
        let result: Result<(), AppError> = bounded(
            "account store",
            Duration::from_secs(5),
            std::future::pending(),
        )
        .await;
        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_bounded_call_passes_through_result() {
        let result = bounded("account store", Duration::from_secs(5), async {
            Err::<(), _>(AppError::DuplicateEmail)
        })
        .await;
        assert!(matches!(result, Err(AppError::DuplicateEmail)));
    }
}
