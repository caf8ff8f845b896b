use std::env;

use anyhow::{Context, Result};
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use tokio_postgres::NoTls;

/// Application settings read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub allowed_origins: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub upload_dir: String,
    pub static_dir: String,
    pub rate_limit_per_second: u32,
    pub rate_limit_burst: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        Ok(Self {
            bind_address: format!("0.0.0.0:{}", port),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET not set")?,
            token_ttl_hours: env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()),
            rate_limit_per_second: env::var("RATE_LIMIT_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            rate_limit_burst: env::var("RATE_LIMIT_BURST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        })
    }
}

pub fn get_pg_pool() -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(env::var("PG_HOST").context("PG_HOST not set")?);
    cfg.user = Some(env::var("PG_USER").context("PG_USER not set")?);
    cfg.password = env::var("PG_PASS").ok();
    cfg.dbname = Some(env::var("PG_DB").context("PG_DB not set")?);

    // set pool config safely (PoolConfig.max_size is usize)
    if cfg.pool.is_none() {
        cfg.pool = Some(PoolConfig::default());
    }
    if let Some(ref mut pcfg) = cfg.pool {
        pcfg.max_size = 16;
    }

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .context("failed to create postgres pool")
}
