use anyhow::{Context, Result};
use dotenvy::dotenv;
use source_curation::CurationConfig;
use std::env;

pub const DEFAULT_PORT: u16 = 8080;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub curation: CurationConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: match env::var("PORT") {
                Ok(port) => port.parse().context("PORT must be a valid number")?,
                Err(_) => DEFAULT_PORT,
            },
            curation: CurationConfig::from_env()
                .context("Failed to load LLM and feedback store settings")?,
        })
    }
}
