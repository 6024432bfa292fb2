use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Redis,
    /// Nothing survives a restart. Useful for demos and throwaway sessions.
    Memory,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageBackend::File => "file",
            StorageBackend::Redis => "redis",
            StorageBackend::Memory => "memory",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "redis" => Ok(StorageBackend::Redis),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("STORAGE_BACKEND must be one of file, redis, memory (got '{other}')"),
        }
    }
}

/// Service configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub tailor_api_url: String,
    pub tailor_api_token: Option<String>,
    pub http_timeout_secs: u64,
    pub storage_backend: StorageBackend,
    pub storage_path: PathBuf,
    pub redis_url: Option<String>,
    pub redis_key_prefix: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            var(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let storage_backend = var("STORAGE_BACKEND")
            .map(|v| v.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or(StorageBackend::File);

        let redis_url = match storage_backend {
            StorageBackend::Redis => Some(require("REDIS_URL")?),
            _ => var("REDIS_URL"),
        };

        Ok(Config {
            tailor_api_url: require("TAILOR_API_URL")?,
            tailor_api_token: var("TAILOR_API_TOKEN").filter(|v| !v.trim().is_empty()),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            storage_backend,
            storage_path: var("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".tailor/storage.json")),
            redis_url,
            redis_key_prefix: var("REDIS_KEY_PREFIX").unwrap_or_else(|| "tailor:".to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "8787".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
