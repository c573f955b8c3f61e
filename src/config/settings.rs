//! Settings
//!
//! Defines the config file schema and the immutable [`Config`] view over it.

use crate::error::{LingxingError, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

/// Default API gateway
pub const DEFAULT_BASE_URL: &str = "https://openapi.lingxing.com";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default wait between rate-limited retries, in seconds
pub const DEFAULT_LIMIT_WAIT_SECS: f64 = 0.2;

/// Default number of rate-limited retries
pub const DEFAULT_LIMIT_RETRY: u32 = 60;

/// Number of leading credential characters kept in summaries
const REDACT_KEEP: usize = 10;

/// Top-level sections; each must be an object when present
const SECTIONS: [&str; 3] = ["api", "proxy", "settings"];

/// Root of the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    api: ApiSection,
    proxy: ProxySection,
    settings: SettingsSection,
}

/// `api` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ApiSection {
    app_id: Option<String>,
    app_secret: Option<String>,
    base_url: Option<String>,
}

/// `proxy` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ProxySection {
    enabled: Option<bool>,
    https_url: Option<String>,
    http_url: Option<String>,
}

/// `settings` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SettingsSection {
    #[serde(deserialize_with = "whole_number")]
    timeout: Option<u64>,
    ignore_api_limit: Option<bool>,
    ignore_api_limit_wait: Option<f64>,
    #[serde(deserialize_with = "whole_number")]
    ignore_api_limit_retry: Option<u32>,
}

/// Accept `45` and `45.0` alike, reject fractions and negatives
fn whole_number<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let whole = number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    });

    whole
        .and_then(|n| T::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a whole number, got {number}")))
}

/// Drop `null` sections so they read as absent; reject non-object sections
fn normalize_sections(root: &mut Map<String, Value>) -> std::result::Result<(), String> {
    for section in SECTIONS {
        match root.get(section) {
            Some(Value::Null) => {
                root.remove(section);
            }
            Some(Value::Object(_)) | None => {}
            Some(_) => return Err(format!("`{section}` must be an object")),
        }
    }
    Ok(())
}

/// Loaded configuration.
///
/// Read-only once built: every accessor falls back to its default when the key
/// is absent, so none of them can fail. Reloading yields a new `Config`.
#[derive(Debug, Clone, Default)]
pub struct Config {
    raw: RawConfig,
}

impl Config {
    /// Parse a config document held in memory
    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("<string>"))
    }

    /// Parse a config document, attributing errors to `path`
    pub(crate) fn parse(content: &str, path: &Path) -> Result<Self> {
        let parse_error = |message: String| LingxingError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let value: Value = serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
        let Value::Object(mut root) = value else {
            return Err(parse_error("config root must be an object".to_string()));
        };
        normalize_sections(&mut root).map_err(parse_error)?;

        let raw: RawConfig = serde_json::from_value(Value::Object(root))
            .map_err(|e| parse_error(e.to_string()))?;

        Ok(Self { raw })
    }

    /// Application ID
    pub fn app_id(&self) -> &str {
        self.raw.api.app_id.as_deref().unwrap_or_default()
    }

    /// Application secret
    pub fn app_secret(&self) -> &str {
        self.raw.api.app_secret.as_deref().unwrap_or_default()
    }

    /// Gateway base URL
    pub fn base_url(&self) -> &str {
        self.raw
            .api
            .base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    /// Whether outbound calls go through a proxy
    pub fn proxy_enabled(&self) -> bool {
        self.raw.proxy.enabled.unwrap_or(false)
    }

    /// Proxy URL, HTTPS preferred over HTTP. `None` whenever the proxy is disabled.
    pub fn proxy_url(&self) -> Option<&str> {
        if !self.proxy_enabled() {
            return None;
        }

        let proxy = &self.raw.proxy;
        [proxy.https_url.as_deref(), proxy.http_url.as_deref()]
            .into_iter()
            .flatten()
            .find(|url| !url.is_empty())
    }

    /// Request timeout in seconds
    pub fn timeout(&self) -> u64 {
        self.raw.settings.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// Request timeout as a duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout())
    }

    /// Whether rate-limit responses are waited out instead of failing
    pub fn ignore_api_limit(&self) -> bool {
        self.raw.settings.ignore_api_limit.unwrap_or(false)
    }

    /// Seconds to wait before retrying a rate-limited call
    pub fn ignore_api_limit_wait(&self) -> f64 {
        self.raw
            .settings
            .ignore_api_limit_wait
            .unwrap_or(DEFAULT_LIMIT_WAIT_SECS)
    }

    /// Maximum retries of a rate-limited call
    pub fn ignore_api_limit_retry(&self) -> u32 {
        self.raw
            .settings
            .ignore_api_limit_retry
            .unwrap_or(DEFAULT_LIMIT_RETRY)
    }

    /// Check the config for missing values.
    ///
    /// Returns every problem found; an empty list means the config is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_id().is_empty() {
            errors.push("Missing api.app_id".to_string());
        }
        if self.app_secret().is_empty() {
            errors.push("Missing api.app_secret".to_string());
        }
        if self.proxy_enabled() && self.proxy_url().is_none() {
            errors.push(
                "Proxy is enabled but neither proxy.https_url nor proxy.http_url is set"
                    .to_string(),
            );
        }

        errors
    }

    /// Like [`Config::validate`], but as a `Result`
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LingxingError::Validation(errors))
        }
    }

    /// Human-readable report with credentials truncated
    pub fn summary(&self) -> String {
        let rule = "=".repeat(50);
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Configuration summary");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "App ID: {}", redact(self.app_id()));
        let _ = writeln!(out, "App secret: {}", redact(self.app_secret()));
        let _ = writeln!(out, "API base URL: {}", self.base_url());
        let _ = writeln!(
            out,
            "Proxy: {}",
            if self.proxy_enabled() { "enabled" } else { "disabled" }
        );
        if self.proxy_enabled() {
            let _ = writeln!(out, "Proxy URL: {}", self.proxy_url().unwrap_or("<missing>"));
        }
        let _ = writeln!(out, "Request timeout: {} s", self.timeout());
        let _ = writeln!(
            out,
            "Ignore API limit: {}",
            if self.ignore_api_limit() { "yes" } else { "no" }
        );
        if self.ignore_api_limit() {
            let _ = writeln!(out, "Limit wait: {} s", self.ignore_api_limit_wait());
            let _ = writeln!(out, "Limit retries: {}", self.ignore_api_limit_retry());
        }
        let _ = writeln!(out, "{rule}");

        out
    }
}

/// Keep the first few characters of a secret
fn redact(value: &str) -> String {
    let head: String = value.chars().take(REDACT_KEEP).collect();
    format!("{}...", head)
}
