use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub review_service_url: String,
    /// Client-side timeout for service calls. `None` leaves timeouts to the
    /// service and the network layer.
    pub review_service_timeout: Option<Duration>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let review_service_url = lookup("REVIEW_SERVICE_URL")
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let review_service_timeout = lookup("REVIEW_SERVICE_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .context("REVIEW_SERVICE_TIMEOUT_SECS must be a whole number of seconds")
            })
            .transpose()?
            .map(Duration::from_secs);

        Ok(Config {
            review_service_url,
            review_service_timeout,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.review_service_url, "http://localhost:8000");
        assert_eq!(config.port, 8080);
        assert!(config.review_service_timeout.is_none());
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("REVIEW_SERVICE_URL", "https://reviews.internal/"),
            ("REVIEW_SERVICE_TIMEOUT_SECS", "300"),
            ("PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(config.review_service_url, "https://reviews.internal");
        assert_eq!(config.review_service_timeout, Some(Duration::from_secs(300)));
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_port() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("REVIEW_SERVICE_TIMEOUT_SECS", "-1")]).is_err());
    }
}
