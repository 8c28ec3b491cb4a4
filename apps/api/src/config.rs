use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; a missing API key only disables text enhancement.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory holding the saved document.
    pub storage_dir: PathBuf,
    /// Slot name; the document is stored as `<storage_dir>/<storage_key>.json`.
    pub storage_key: String,
    pub anthropic_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
            storage_dir: PathBuf::from(var("CV_STORAGE_DIR", "./data")),
            storage_key: var("CV_STORAGE_KEY", "cv_data"),
            anthropic_api_key: lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()),
        })
    }
}
