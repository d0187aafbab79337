//! Configuration module
//!
//! Env-driven application configuration: database settings, the attachment
//! storage root, and the upload pipeline knobs (worker bound, cancellation
//! policy).

use std::env;
use std::path::PathBuf;

use crate::models::CancellationPolicy;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
/// Hard cap on simultaneous attachment writes for one submission; keeps
/// file descriptors and disk bandwidth sane under large batches.
const MAX_PARALLEL_UPLOADS: usize = 4;
const STORAGE_ROOT: &str = "wwwroot/uploads/issues";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Root directory under which per-issue attachment directories live.
    pub storage_root: PathBuf,
    pub max_parallel_uploads: usize,
    pub upload_cancellation_policy: CancellationPolicy,
}

impl AppConfig {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let upload_cancellation_policy = match env::var("UPLOAD_CANCELLATION_POLICY") {
            Ok(raw) => CancellationPolicy::parse(&raw)
                .map_err(|e| anyhow::anyhow!("UPLOAD_CANCELLATION_POLICY: {}", e))?,
            Err(_) => CancellationPolicy::default(),
        };

        let config = AppConfig {
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            storage_root: env::var("STORAGE_ROOT")
                .unwrap_or_else(|_| STORAGE_ROOT.to_string())
                .into(),
            max_parallel_uploads: env::var("MAX_PARALLEL_UPLOADS")
                .unwrap_or_else(|_| MAX_PARALLEL_UPLOADS.to_string())
                .parse()
                .unwrap_or(MAX_PARALLEL_UPLOADS),
            upload_cancellation_policy,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_url.trim().is_empty() {
            return Err(anyhow::anyhow!("DATABASE_URL cannot be empty"));
        }
        if self.storage_root.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("STORAGE_ROOT cannot be empty"));
        }
        if self.max_parallel_uploads == 0 {
            return Err(anyhow::anyhow!("MAX_PARALLEL_UPLOADS must be at least 1"));
        }
        Ok(())
    }
}
