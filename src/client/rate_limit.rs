//! Rate Limit Handling
//!
//! Detects rate-limit responses and decides whether a call may wait and retry.

use crate::client::ClientOptions;
use reqwest::header::HeaderMap;
use std::time::Duration;

/// Gateway code for "requests too frequent"
pub const GATEWAY_RATE_LIMIT_CODE: i64 = 3001008;

/// Wait-and-retry policy for rate-limited calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    /// Retry at all
    pub enabled: bool,

    /// Wait before each retry, unless the server asks for longer
    pub wait: Duration,

    /// Longest server-requested wait honored (never below `wait`)
    pub max_wait: Duration,

    /// Retries allowed per call
    pub max_retries: u32,
}

impl LimitPolicy {
    /// Fail on the first rate-limit response
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            wait: Duration::ZERO,
            max_wait: Duration::ZERO,
            max_retries: 0,
        }
    }

    /// Wait to apply before retry number `retries + 1`, or `None` to give up
    pub fn next_wait(&self, retries: u32, retry_after: Option<Duration>) -> Option<Duration> {
        if !self.enabled || retries >= self.max_retries {
            return None;
        }

        Some(retry_after.map_or(self.wait, |server| {
            server.min(self.max_wait).max(self.wait)
        }))
    }

    /// Detect if a response indicates a rate limit error
    pub fn is_rate_limit_error(status: u16, body: &str) -> bool {
        // HTTP 429 Too Many Requests
        if status == 429 {
            return true;
        }

        // The gateway answers 200 with its own code
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            let code = value.get("code").and_then(|c| match c {
                serde_json::Value::Number(n) => n.as_i64(),
                serde_json::Value::String(s) => s.parse().ok(),
                _ => None,
            });
            match code {
                Some(GATEWAY_RATE_LIMIT_CODE) => return true,
                Some(0) | Some(200) => return false,
                _ if (200..300).contains(&status) => return false,
                _ => {}
            }
        }

        let lower_body = body.to_lowercase();
        lower_body.contains("rate limit")
            || lower_body.contains("rate_limit")
            || lower_body.contains("too many requests")
            || lower_body.contains("too frequent")
    }

    /// Server-requested wait from a `retry-after` header.
    ///
    /// Accepts delta-seconds or an HTTP-date; dates in the past mean no wait.
    pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
        let value = headers.get("retry-after")?.to_str().ok()?.trim();

        if let Ok(secs) = value.parse::<u64>() {
            return Some(Duration::from_secs(secs));
        }

        let at = chrono::DateTime::parse_from_rfc2822(value).ok()?;
        let delta = at.with_timezone(&chrono::Utc) - chrono::Utc::now();
        Some(delta.to_std().unwrap_or(Duration::ZERO))
    }
}

impl From<&ClientOptions> for LimitPolicy {
    fn from(options: &ClientOptions) -> Self {
        if !options.ignore_api_limit {
            return Self::disabled();
        }

        Self {
            enabled: true,
            wait: options.ignore_api_limit_wait,
            max_wait: options.timeout.max(options.ignore_api_limit_wait),
            max_retries: options.ignore_api_limit_retry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn policy(wait_ms: u64, max_wait_secs: u64, max_retries: u32) -> LimitPolicy {
        LimitPolicy {
            enabled: true,
            wait: Duration::from_millis(wait_ms),
            max_wait: Duration::from_secs(max_wait_secs),
            max_retries,
        }
    }

    #[test]
    fn test_is_rate_limit_error() {
        assert!(LimitPolicy::is_rate_limit_error(429, ""));
        assert!(LimitPolicy::is_rate_limit_error(
            200,
            r#"{"code": 3001008, "message": "requests too frequent"}"#
        ));
        assert!(LimitPolicy::is_rate_limit_error(200, r#"{"code": "3001008"}"#));
        assert!(LimitPolicy::is_rate_limit_error(400, "rate limit exceeded"));
        assert!(LimitPolicy::is_rate_limit_error(
            503,
            r#"{"code": 500, "message": "Too Many Requests"}"#
        ));
        assert!(!LimitPolicy::is_rate_limit_error(200, r#"{"code": 0, "data": []}"#));
        assert!(!LimitPolicy::is_rate_limit_error(500, "internal error"));
    }

    #[test]
    fn test_success_body_mentioning_rate_limit() {
        let body = r#"{"code": 0, "data": [{"sid": 1, "name": "No Rate Limit Outlet"}]}"#;
        assert!(!LimitPolicy::is_rate_limit_error(200, body));

        let body = r#"{"code": "200", "data": {"note": "too many requests served"}}"#;
        assert!(!LimitPolicy::is_rate_limit_error(200, body));

        let body = r#"{"code": 2001003, "message": "token invalid", "data": "rate limit"}"#;
        assert!(!LimitPolicy::is_rate_limit_error(200, body));
    }

    #[test]
    fn test_disabled_policy_never_retries() {
        let policy = LimitPolicy::disabled();
        assert_eq!(policy.next_wait(0, None), None);
    }

    #[test]
    fn test_policy_counts_retries() {
        let policy = policy(200, 30, 2);
        assert_eq!(policy.next_wait(0, None), Some(Duration::from_millis(200)));
        assert_eq!(policy.next_wait(1, None), Some(Duration::from_millis(200)));
        assert_eq!(policy.next_wait(2, None), None);
    }

    #[test]
    fn test_server_wait_is_clamped() {
        let policy = policy(200, 30, 5);
        assert_eq!(
            policy.next_wait(0, Some(Duration::from_secs(2))),
            Some(Duration::from_secs(2))
        );
        assert_eq!(
            policy.next_wait(0, Some(Duration::from_millis(50))),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            policy.next_wait(0, Some(Duration::from_secs(u64::MAX))),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_max_wait_from_options() {
        let options = ClientOptions {
            app_id: String::new(),
            app_secret: String::new(),
            base_url: String::new(),
            timeout: Duration::from_secs(10),
            ignore_api_limit: true,
            ignore_api_limit_wait: Duration::from_secs(20),
            ignore_api_limit_retry: 1,
            proxy: None,
        };
        let policy = LimitPolicy::from(&options);
        assert_eq!(policy.max_wait, Duration::from_secs(20));
        assert_eq!(
            policy.next_wait(0, Some(Duration::from_secs(3600))),
            Some(Duration::from_secs(20))
        );
    }

    #[test]
    fn test_retry_after_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(LimitPolicy::retry_after(&headers), None);

        headers.insert("retry-after", HeaderValue::from_static("5"));
        assert_eq!(LimitPolicy::retry_after(&headers), Some(Duration::from_secs(5)));

        headers.insert(
            "retry-after",
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(LimitPolicy::retry_after(&headers), Some(Duration::ZERO));

        headers.insert("retry-after", HeaderValue::from_static("9999999999999999h"));
        assert_eq!(LimitPolicy::retry_after(&headers), None);

        headers.insert("retry-after", HeaderValue::from_static("99999999999999999999999"));
        assert_eq!(LimitPolicy::retry_after(&headers), None);
    }
}
