use std::fmt;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if any required variable is missing.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub archive: ArchiveConfig,
    pub port: u16,
    pub rust_log: String,
}

/// Connection details for the remote archive table.
#[derive(Clone)]
pub struct ArchiveConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            archive: ArchiveConfig {
                base_url: require_env("ARCHIVE_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                api_key: require_env("ARCHIVE_API_KEY")?,
                table: require_env("ARCHIVE_TABLE")?,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

// Secrets stay out of the startup log.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"<redacted>")
            .field("archive", &self.archive)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl fmt::Debug for ArchiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("table", &self.table)
            .finish()
    }
}
