use anyhow::{Context, Result};

/// Upstream pipeline address used when `PIPELINE_API_URL` is unset.
const DEFAULT_PIPELINE_API_URL: &str = "http://localhost:8005";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub pipeline_api_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            pipeline_api_url: std::env::var("PIPELINE_API_URL")
                .unwrap_or_else(|_| DEFAULT_PIPELINE_API_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
