use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::kernel::DEFAULT_MODEL_TIMEOUT;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Without a key the server still runs; menu extraction answers with placeholders
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: Option<String>,
    /// When set, groups are mirrored to this JSON file
    pub group_store_path: Option<PathBuf>,
    pub redirect_timeout: Duration,
    pub model_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_base_url: non_empty_var("GEMINI_BASE_URL"),
            group_store_path: non_empty_var("GROUP_STORE_PATH").map(PathBuf::from),
            redirect_timeout: seconds_var("REDIRECT_TIMEOUT_SECS", 8)?,
            model_timeout: seconds_var("MODEL_TIMEOUT_SECS", DEFAULT_MODEL_TIMEOUT.as_secs())?,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn seconds_var(key: &str, default: u64) -> Result<Duration> {
    let secs = match non_empty_var(key) {
        Some(v) => v
            .parse::<u64>()
            .with_context(|| format!("{} must be a whole number of seconds", key))?,
        None => default,
    };
    Ok(Duration::from_secs(secs))
}
