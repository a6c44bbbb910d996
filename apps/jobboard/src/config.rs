use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::listing::DEFAULT_PAGE_SIZE;

const TOKEN_FILE_NAME: &str = "auth_token";

/// Client configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub token_file: PathBuf,
    pub page_size: usize,
    /// AI insights are disabled when unset.
    pub anthropic_api_key: Option<String>,
    pub anthropic_api_url: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let page_size = match std::env::var("JOBBOARD_PAGE_SIZE") {
            Ok(v) => v
                .parse::<usize>()
                .context("JOBBOARD_PAGE_SIZE must be a positive integer")?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };
        if page_size == 0 {
            anyhow::bail!("JOBBOARD_PAGE_SIZE must be a positive integer");
        }

        let token_file = match std::env::var("JOBBOARD_TOKEN_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_token_file()?,
        };

        Ok(Config {
            api_base_url: require_env("JOBBOARD_API_URL")?
                .trim_end_matches('/')
                .to_string(),
            token_file,
            page_size,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            anthropic_api_url: optional_env("ANTHROPIC_API_URL"),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn default_token_file() -> Result<PathBuf> {
    let dir = dirs::config_dir().context(
        "Could not determine the config directory; set JOBBOARD_TOKEN_FILE explicitly",
    )?;
    Ok(dir.join("jobboard").join(TOKEN_FILE_NAME))
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
