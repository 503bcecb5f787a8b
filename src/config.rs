use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{AppError, Result};

const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration, assembled from environment variables at startup
/// and passed explicitly to the components that need it.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: String,
    pub api_key: String,
    pub base_url: String,
    pub upstream_timeout: Duration,
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let api_key = env::var("SPOONACULAR_API_KEY")
            .map_err(|_| AppError::Config("SPOONACULAR_API_KEY is not set".to_string()))?;

        let base_url =
            env::var("SPOONACULAR_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Url::parse(&base_url)
            .map_err(|e| AppError::Config(format!("invalid SPOONACULAR_BASE_URL: {e}")))?;

        let port = parse_var("RECIPEBOX_PORT", 8000)?;
        let timeout_secs = parse_var(
            "RECIPEBOX_UPSTREAM_TIMEOUT_SECS",
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?;

        Ok(Self {
            port,
            db_path: env::var("RECIPEBOX_DB_PATH").unwrap_or_else(|_| "recipebox.db".to_string()),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            upstream_timeout: Duration::from_secs(timeout_secs),
            cors_origin: env::var("RECIPEBOX_CORS_ORIGIN").ok(),
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("invalid {key} value: {e}"))),
        Err(_) => Ok(default),
    }
}
