use std::path::PathBuf;

use crate::orders::manager::DEFAULT_EVENT_CHANNEL_CAPACITY;

/// Server configuration
///
/// # Environment variables
///
/// | variable | default | meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | database and log root |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development, staging or production |
/// | LOG_LEVEL | info | tracing level filter |
/// | LOG_DIR | (unset) | daily rolling log files go here when set |
/// | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
/// | EVENT_CHANNEL_CAPACITY | 4096 | order event broadcast buffer |
///
/// ```ignore
/// WORK_DIR=/srv/dining HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub request_timeout_ms: u64,
    pub event_channel_capacity: usize,
}

impl Config {
    /// Load from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            event_channel_capacity: std::env::var("EVENT_CHANNEL_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|c| *c > 0)
                .unwrap_or(DEFAULT_EVENT_CHANNEL_CAPACITY),
        }
    }

    /// Override the work dir and port, keeping the rest from the environment
    ///
    /// Mostly for tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// `{work_dir}/database`
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// `{work_dir}/database/dining.redb`
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("dining.redb")
    }

    /// Create the directories the server writes into
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        if let Some(dir) = &self.log_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
