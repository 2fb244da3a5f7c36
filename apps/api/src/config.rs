use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Deployment mode. Gates cookie security flags and error verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => bail!("APP_ENV must be 'development' or 'production', got '{other}'"),
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub session_secret: String,
    /// Front-end origin allowed to make credentialed cross-origin requests.
    pub frontend_origin: Option<String>,
    pub port: u16,
    pub environment: Environment,
    pub public_dir: PathBuf,
    /// Upper bound on any single account/session store call.
    pub store_timeout: Duration,
    pub rust_log: String,
}

const MIN_PRODUCTION_SECRET_LEN: usize = 32;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw)?,
            None => Environment::Development,
        };

        let session_secret = require(&lookup, "SESSION_SECRET")?;
        if environment.is_production() && session_secret.len() < MIN_PRODUCTION_SECRET_LEN {
            bail!("SESSION_SECRET must be at least {MIN_PRODUCTION_SECRET_LEN} bytes in production");
        }

        let store_timeout_secs = lookup("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u64>()
            .context("STORE_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            database_url: database_url(&lookup)?,
            redis_url: require(&lookup, "REDIS_URL")?,
            session_secret,
            frontend_origin: lookup("FRONTEND_ORIGIN").filter(|o| !o.trim().is_empty()),
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            environment,
            public_dir: PathBuf::from(lookup("PUBLIC_DIR").unwrap_or_else(|| "public".to_string())),
            store_timeout: Duration::from_secs(store_timeout_secs),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// `DATABASE_URL` wins; otherwise the URL is assembled from discrete credentials.
fn database_url<F>(lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL") {
        return Ok(url);
    }

    let username = require(lookup, "DB_USERNAME")
        .context("Set DATABASE_URL or DB_USERNAME/DB_PASSWORD/DB_NAME")?;
    let password = require(lookup, "DB_PASSWORD")?;
    let dbname = require(lookup, "DB_NAME")?;
    let host = lookup("DB_HOST").unwrap_or_else(|| "localhost:5432".to_string());

    Ok(format!("postgres://{username}:{password}@{host}/{dbname}"))
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
impl Config {
    /// Development config pointing at nothing; router tests swap in in-memory stores.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            redis_url: "redis://localhost".to_string(),
            session_secret: "test-secret-test-secret-test-secret".to_string(),
            frontend_origin: None,
            port: 0,
            environment: Environment::Development,
            public_dir: PathBuf::from("public"),
            store_timeout: Duration::from_secs(5),
            rust_log: "debug".to_string(),
        }
    }
}
