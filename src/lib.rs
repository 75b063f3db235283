pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use chrono::{DateTime, FixedOffset, Utc};
use sqlx::PgPool;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    /// Present only when `REDIS_URL` is configured; backs token revocation.
    pub redis: Option<redis::Client>,
}

impl AppState {
    /// Build state from a pool and config, opening the Redis client if one is configured.
    pub fn new(db: PgPool, config: config::AppConfig) -> Result<Self, redis::RedisError> {
        let redis = config
            .redis_url
            .as_deref()
            .map(redis::Client::open)
            .transpose()?;
        Ok(Self { db, config, redis })
    }

    /// Current time in the gym's business timezone.
    pub fn business_now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.config.business_offset())
    }
}
