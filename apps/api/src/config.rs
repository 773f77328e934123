use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the service runs on the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on concurrent inserts during one import.
    pub import_concurrency: usize,
    /// Request body limit for the import endpoint.
    pub import_max_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10)?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            import_concurrency: env_or::<usize>("IMPORT_CONCURRENCY", 4)?.max(1),
            import_max_bytes: env_or("IMPORT_MAX_BYTES", 5 * 1024 * 1024)?,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: None,
            database_max_connections: 1,
            port: 0,
            rust_log: "debug".to_string(),
            import_concurrency: 2,
            import_max_bytes: 1024 * 1024,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_uses_default_when_unset() {
        let value: u16 = env_or("TRACKER_TEST_UNSET_VARIABLE", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_env_or_rejects_garbage() {
        std::env::set_var("TRACKER_TEST_BAD_NUMBER", "eight");
        let result: Result<u16> = env_or("TRACKER_TEST_BAD_NUMBER", 1);
        assert!(result.is_err());
    }
}
