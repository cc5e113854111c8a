use std::num::NonZeroU64;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{worst_case_generation_time, GEMINI_API_URL};

/// Headroom on top of the retry budget for the default deadline.
const DEADLINE_SLACK: Duration = Duration::from_secs(10);

/// Default overall deadline: room for every attempt and backoff, plus slack.
pub fn default_generation_deadline() -> Duration {
    worst_case_generation_time() + DEADLINE_SLACK
}

/// Application configuration loaded from environment variables.
/// Every setting has a default; an empty `GEMINI_API_KEY` switches the
/// service to fallback-only mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub host: String,
    pub port: u16,
    /// Upper bound on one generation, retries included.
    pub generation_deadline: Duration,
    pub fallback_seed: Option<u64>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(v) => v.parse::<u16>().context("PORT must be a valid port number")?,
            None => 5000,
        };

        let generation_deadline = match non_empty("GENERATION_DEADLINE_SECS") {
            Some(v) => v
                .parse::<NonZeroU64>()
                .map(|secs| Duration::from_secs(secs.get()))
                .context("GENERATION_DEADLINE_SECS must be a positive whole number of seconds")?,
            None => default_generation_deadline(),
        };

        let fallback_seed = non_empty("FALLBACK_SEED")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("FALLBACK_SEED must be an unsigned integer")?;

        Ok(Config {
            gemini_api_key: non_empty("GEMINI_API_KEY").map(|k| k.trim().to_string()),
            gemini_api_url: non_empty("GEMINI_API_URL")
                .unwrap_or_else(|| GEMINI_API_URL.to_string()),
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            generation_deadline,
            fallback_seed,
            rust_log: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_api_url, GEMINI_API_URL);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.generation_deadline, default_generation_deadline());
        assert!(config.fallback_seed.is_none());
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_blank_api_key_means_fallback_only() {
        let config = config_from(&[("GEMINI_API_KEY", "   ")]).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_API_URL", "http://localhost:9999/generate"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("GENERATION_DEADLINE_SECS", "30"),
            ("FALLBACK_SEED", "7"),
        ])
        .unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini_api_url, "http://localhost:9999/generate");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.generation_deadline, Duration::from_secs(30));
        assert_eq!(config.fallback_seed, Some(7));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_default_deadline_covers_every_attempt() {
        // 3 x 60s attempts plus 2s and 4s of backoff.
        assert!(default_generation_deadline() >= Duration::from_secs(186));
        assert!(default_generation_deadline() >= worst_case_generation_time());
    }

    #[test]
    fn test_zero_deadline_is_rejected() {
        let err = config_from(&[("GENERATION_DEADLINE_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("GENERATION_DEADLINE_SECS"));

        assert!(config_from(&[("GENERATION_DEADLINE_SECS", "soon")]).is_err());
    }

    #[test]
    fn test_invalid_seed_is_rejected() {
        assert!(config_from(&[("FALLBACK_SEED", "-1")]).is_err());
    }
}
