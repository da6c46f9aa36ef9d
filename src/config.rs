use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub max_body_size: usize,
    pub session_ttl: Duration,
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let storage = match env_or("FORMWRIGHT_STORAGE", "postgres").as_str() {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => return Err(format!("Invalid FORMWRIGHT_STORAGE: {other}")),
        };

        let database_url = match storage {
            StorageBackend::Postgres => Some(env_required("DATABASE_URL")?),
            StorageBackend::Memory => std::env::var("DATABASE_URL").ok(),
        };

        let host: IpAddr = env_or("FORMWRIGHT_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMWRIGHT_HOST: {e}"))?;

        let port: u16 = env_or("FORMWRIGHT_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid FORMWRIGHT_PORT: {e}"))?;

        let base_url = env_or("FORMWRIGHT_BASE_URL", &default_base_url(port));

        let max_body_size: usize = env_or("FORMWRIGHT_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid FORMWRIGHT_MAX_BODY_SIZE: {e}"))?;

        let session_ttl_secs: u64 = env_or("FORMWRIGHT_SESSION_TTL_SECS", "3600")
            .parse()
            .map_err(|e| format!("Invalid FORMWRIGHT_SESSION_TTL_SECS: {e}"))?;

        let log_level = env_or("FORMWRIGHT_LOG_LEVEL", "info");

        Ok(Config {
            storage,
            database_url,
            host,
            port,
            base_url,
            max_body_size,
            session_ttl: Duration::from_secs(session_ttl_secs),
            log_level,
        })
    }
}

/// Base for share links when `FORMWRIGHT_BASE_URL` is unset.
pub fn default_base_url(port: u16) -> String {
    format!("http://localhost:{port}")
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
