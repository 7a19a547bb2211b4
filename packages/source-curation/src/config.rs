//! Configuration loaded from environment variables.

use dotenvy::dotenv;
use llm_client::ClientConfig;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::security::SecretString;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_TRACKING_PATH: &str = "data/quality_tracking.json";

/// LLM connection settings and the feedback store location.
#[derive(Debug, Clone)]
pub struct CurationConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout: Duration,
    pub http_referer: String,
    pub site_title: String,
    /// Minimum interval between two LLM requests
    pub rate_limit: Duration,
    pub tracking_path: PathBuf,
}

impl CurationConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file is loaded first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("LLM_API_KEY")
            .or_else(|| get("OPENROUTER_API_KEY"))
            .ok_or_else(|| ConfigError::Missing("LLM_API_KEY".into()))?;

        let temperature: f32 = parse_or(&get, "LLM_TEMPERATURE", 0.7)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(invalid("LLM_TEMPERATURE", "must be between 0 and 2"));
        }

        let top_p: f32 = parse_or(&get, "LLM_TOP_P", 0.9)?;
        if !(top_p > 0.0 && top_p <= 1.0) {
            return Err(invalid("LLM_TOP_P", "must be in (0, 1]"));
        }

        let max_tokens: u32 = parse_or(&get, "LLM_MAX_TOKENS", 4000)?;
        if max_tokens == 0 {
            return Err(invalid("LLM_MAX_TOKENS", "must be positive"));
        }

        Ok(Self {
            api_key: SecretString::new(api_key),
            base_url: get("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens,
            temperature,
            top_p,
            timeout: Duration::from_secs(parse_or(&get, "LLM_TIMEOUT_SECS", 300)?),
            http_referer: get("LLM_HTTP_REFERER")
                .unwrap_or_else(|| "https://github.com/biography-sources".to_string()),
            site_title: get("LLM_SITE_TITLE")
                .unwrap_or_else(|| "Biography Source Curation".to_string()),
            rate_limit: Duration::from_millis(parse_or(&get, "LLM_RATE_LIMIT_MS", 1000)?),
            tracking_path: get("QUALITY_TRACKING_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TRACKING_PATH)),
        })
    }

    /// Client settings for [`llm_client::LlmClient`].
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.api_key.expose())
            .with_base_url(&self.base_url)
            .with_model(&self.model)
            .with_timeout(self.timeout)
            .with_attribution(&self.http_referer, &self.site_title)
            .with_min_request_interval(self.rate_limit);
        config.max_tokens = self.max_tokens;
        config.temperature = self.temperature;
        config.top_p = self.top_p;
        config
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, &e.to_string())),
        None => Ok(default),
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
