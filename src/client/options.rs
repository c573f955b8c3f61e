//! Client Options
//!
//! Construction parameters for a seller data API client.

use crate::config::Config;
use std::time::Duration;

/// Everything a client needs to be built
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// Application ID
    pub app_id: String,

    /// Application secret
    pub app_secret: String,

    /// Gateway base URL
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Wait out rate-limit responses instead of failing
    pub ignore_api_limit: bool,

    /// Wait before each rate-limited retry
    pub ignore_api_limit_wait: Duration,

    /// Maximum rate-limited retries per call
    pub ignore_api_limit_retry: u32,

    /// Outbound proxy, if any
    pub proxy: Option<String>,
}

impl From<&Config> for ClientOptions {
    fn from(config: &Config) -> Self {
        Self {
            app_id: config.app_id().to_string(),
            app_secret: config.app_secret().to_string(),
            base_url: config.base_url().to_string(),
            timeout: config.timeout_duration(),
            ignore_api_limit: config.ignore_api_limit(),
            // Negative or non-finite waits collapse to zero.
            ignore_api_limit_wait: Duration::try_from_secs_f64(config.ignore_api_limit_wait())
                .unwrap_or(Duration::ZERO),
            ignore_api_limit_retry: config.ignore_api_limit_retry(),
            proxy: config.proxy_url().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let config = Config::from_json_str(
            r#"{
                "api": {"app_id": "ak", "app_secret": "sk"},
                "proxy": {"enabled": true, "http_url": "http://127.0.0.1:3028/"},
                "settings": {"timeout": 12, "ignore_api_limit": true, "ignore_api_limit_wait": 0.5, "ignore_api_limit_retry": 3}
            }"#,
        )
        .unwrap();

        let options = ClientOptions::from(&config);
        assert_eq!(options.app_id, "ak");
        assert_eq!(options.app_secret, "sk");
        assert_eq!(options.timeout, Duration::from_secs(12));
        assert!(options.ignore_api_limit);
        assert_eq!(options.ignore_api_limit_wait, Duration::from_millis(500));
        assert_eq!(options.ignore_api_limit_retry, 3);
        assert_eq!(options.proxy.as_deref(), Some("http://127.0.0.1:3028/"));
    }

    #[test]
    fn test_negative_wait_is_zero() {
        let config =
            Config::from_json_str(r#"{"settings": {"ignore_api_limit_wait": -1.0}}"#).unwrap();
        assert_eq!(ClientOptions::from(&config).ignore_api_limit_wait, Duration::ZERO);
    }
}
