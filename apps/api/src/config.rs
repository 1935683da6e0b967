use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_OPEN_ROUTER_URL: &str = "https://openrouter.ai";
const DEFAULT_AI_HORDE_URL: &str = "https://stablehorde.net/api";
const DEFAULT_CLIPDROP_URL: &str = "https://clipdrop-api.co";
const DEFAULT_STABILITY_AI_URL: &str = "https://api.stability.ai";

/// Application configuration loaded from environment variables.
///
/// Provider credentials are optional: a missing key degrades that provider
/// to always-fail instead of aborting startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub open_router_api_key: Option<String>,
    pub ai_horde_api_key: Option<String>,
    pub clipdrop_api_key: Option<String>,
    pub stability_ai_api_key: Option<String>,
    pub open_router_url: String,
    pub ai_horde_url: String,
    pub clipdrop_url: String,
    pub stability_ai_url: String,
    pub provider_timeout: Duration,
    /// Sessions untouched for this long are dropped by the sweeper.
    pub session_idle_ttl: Duration,
    pub session_sweep_interval: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            open_router_api_key: optional_env("OPEN_ROUTER_API_KEY"),
            ai_horde_api_key: optional_env("AI_HORDE_API_KEY"),
            clipdrop_api_key: optional_env("CLIPDROP_API_KEY"),
            stability_ai_api_key: optional_env("STABILITY_AI_API_KEY"),
            open_router_url: env_or("OPEN_ROUTER_URL", DEFAULT_OPEN_ROUTER_URL),
            ai_horde_url: env_or("AI_HORDE_URL", DEFAULT_AI_HORDE_URL),
            clipdrop_url: env_or("CLIPDROP_URL", DEFAULT_CLIPDROP_URL),
            stability_ai_url: env_or("STABILITY_AI_URL", DEFAULT_STABILITY_AI_URL),
            provider_timeout: Duration::from_secs(
                env_or("PROVIDER_TIMEOUT_SECS", "60")
                    .parse::<u64>()
                    .context("PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            session_idle_ttl: Duration::from_secs(
                env_or("SESSION_IDLE_TTL_SECS", "3600")
                    .parse::<u64>()
                    .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?,
            ),
            session_sweep_interval: Duration::from_secs(
                env_or("SESSION_SWEEP_INTERVAL_SECS", "60")
                    .parse::<u64>()
                    .context("SESSION_SWEEP_INTERVAL_SECS must be a whole number of seconds")?
                    .max(1),
            ),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Names of the credentials that are absent, for the startup log.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("OPEN_ROUTER_API_KEY", &self.open_router_api_key),
            ("AI_HORDE_API_KEY", &self.ai_horde_api_key),
            ("CLIPDROP_API_KEY", &self.clipdrop_api_key),
            ("STABILITY_AI_API_KEY", &self.stability_ai_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Reads an env var, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
impl Config {
    /// Config pointing every upstream at `base_url` with all credentials set.
    pub fn for_tests(base_url: &str) -> Self {
        Config {
            open_router_api_key: Some("test-openrouter".to_string()),
            ai_horde_api_key: Some("test-horde".to_string()),
            clipdrop_api_key: Some("test-clipdrop".to_string()),
            stability_ai_api_key: Some("test-stability".to_string()),
            open_router_url: base_url.to_string(),
            ai_horde_url: base_url.to_string(),
            clipdrop_url: base_url.to_string(),
            stability_ai_url: base_url.to_string(),
            provider_timeout: Duration::from_secs(5),
            session_idle_ttl: Duration::from_secs(3600),
            session_sweep_interval: Duration::from_secs(60),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
