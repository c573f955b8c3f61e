//! HTTP Client
//!
//! reqwest implementation of [`SellerDataApi`] with proxy, timeout, and
//! rate-limit tolerance.

use crate::api::{AccessToken, ExchangeRate, ListResponse, Marketplace, Seller};
use crate::client::rate_limit::LimitPolicy;
use crate::client::{ClientOptions, SellerDataApi};
use crate::error::{LingxingError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, Proxy, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const ACCESS_TOKEN_PATH: &str = "/api/auth-server/oauth/access-token";
const REFRESH_TOKEN_PATH: &str = "/api/auth-server/oauth/refresh";
const SELLERS_PATH: &str = "/erp/sc/data/seller/lists";
const MARKETPLACES_PATH: &str = "/erp/sc/data/seller/allMarketplace";
const EXCHANGE_RATES_PATH: &str = "/erp/sc/routing/finance/currency/currencyMonth";

/// Longest slice of a response body quoted in errors
const BODY_EXCERPT: usize = 500;

/// Gateway response wrapper
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    code: serde_json::Value,

    msg: Option<String>,
    message: Option<String>,
    data: Option<T>,
    total: Option<u64>,
}

impl<T> Envelope<T> {
    /// Auth endpoints answer "200", data endpoints answer 0
    fn is_success(&self) -> bool {
        match &self.code {
            serde_json::Value::Number(n) => matches!(n.as_i64(), Some(0) | Some(200)),
            serde_json::Value::String(s) => matches!(s.as_str(), "0" | "200"),
            _ => false,
        }
    }

    fn into_result(self) -> Result<(Option<T>, Option<u64>)> {
        if self.is_success() {
            return Ok((self.data, self.total));
        }

        let code = match &self.code {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Err(LingxingError::Api {
            code,
            message: self.message.or(self.msg).unwrap_or_default(),
        })
    }
}

/// Seller data API client over HTTP
pub struct HttpSellerApi {
    /// Inner reqwest client
    client: Client,

    /// Construction options
    options: ClientOptions,

    /// Rate-limit retry policy
    limit: LimitPolicy,

    /// Token from the last successful fetch or refresh
    token: RwLock<Option<AccessToken>>,
}

impl HttpSellerApi {
    /// Create a new client
    pub fn new(options: ClientOptions) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.timeout.min(Duration::from_secs(10)));

        builder = match &options.proxy {
            Some(url) => builder.proxy(Proxy::all(url.as_str()).map_err(|e| {
                LingxingError::Config(format!("Invalid proxy URL {}: {}", url, e))
            })?),
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| LingxingError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            limit: LimitPolicy::from(&options),
            options,
            token: RwLock::new(None),
        })
    }

    /// The options this client was built with
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Token currently held, if any
    pub fn current_token(&self) -> Option<AccessToken> {
        self.token.read().clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.options.base_url.trim_end_matches('/'), path)
    }

    /// Query parameters that authenticate a data call
    fn auth_query(&self) -> Result<Vec<(&'static str, String)>> {
        let token = self
            .token
            .read()
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or_else(|| {
                LingxingError::Auth("no access token; call access_token() first".to_string())
            })?;

        Ok(vec![
            ("access_token", token),
            ("app_key", self.options.app_id.clone()),
            ("timestamp", chrono::Utc::now().timestamp().to_string()),
        ])
    }

    /// Send a request, waiting out rate limits as the policy allows
    async fn send<T, F>(&self, endpoint: &str, build: F) -> Result<(Option<T>, Option<u64>)>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut retries = 0;

        loop {
            tracing::debug!(endpoint, retries, "sending request");
            let response = build().send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.text().await?;

            if LimitPolicy::is_rate_limit_error(status.as_u16(), &body) {
                let retry_after = LimitPolicy::retry_after(&headers);
                match self.limit.next_wait(retries, retry_after) {
                    Some(wait) => {
                        retries += 1;
                        tracing::warn!(
                            endpoint,
                            retries,
                            ?wait,
                            "rate limited, waiting before retry"
                        );
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                    None => return Err(LingxingError::RateLimited { retries }),
                }
            }

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(LingxingError::Auth(format!(
                    "{} answered {}: {}",
                    endpoint,
                    status,
                    excerpt(&body)
                )));
            }

            if !status.is_success() {
                return Err(LingxingError::Request(format!(
                    "{} failed with status {}: {}",
                    endpoint,
                    status,
                    excerpt(&body)
                )));
            }

            let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
                LingxingError::Response(format!(
                    "Failed to parse {} response: {}. Body: {}",
                    endpoint,
                    e,
                    excerpt(&body)
                ))
            })?;

            return envelope.into_result();
        }
    }

    /// Send an auth-server request and keep the issued token
    async fn request_token(&self, path: &str, query: &[(&str, &str)]) -> Result<AccessToken> {
        let url = self.url(path);
        let (data, _) = self
            .send::<AccessToken, _>(path, || self.client.post(&url).query(query))
            .await?;

        let token = data.ok_or_else(|| {
            LingxingError::Response(format!("{} response carried no token", path))
        })?;

        *self.token.write() = Some(token.clone());
        Ok(token)
    }

    async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<ListResponse<T>> {
        let url = self.url(path);
        let query = self.auth_query()?;
        let (data, total) = self
            .send::<Vec<T>, _>(path, || self.client.get(&url).query(&query))
            .await?;

        Ok(ListResponse {
            data: data.unwrap_or_default(),
            total,
        })
    }
}

#[async_trait]
impl SellerDataApi for HttpSellerApi {
    async fn access_token(&self) -> Result<AccessToken> {
        self.request_token(
            ACCESS_TOKEN_PATH,
            &[
                ("appId", self.options.app_id.as_str()),
                ("appSecret", self.options.app_secret.as_str()),
            ],
        )
        .await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AccessToken> {
        self.request_token(
            REFRESH_TOKEN_PATH,
            &[
                ("appId", self.options.app_id.as_str()),
                ("refreshToken", refresh_token),
            ],
        )
        .await
    }

    async fn sellers(&self) -> Result<ListResponse<Seller>> {
        self.list(SELLERS_PATH).await
    }

    async fn marketplaces(&self) -> Result<ListResponse<Marketplace>> {
        self.list(MARKETPLACES_PATH).await
    }

    async fn exchange_rates(&self) -> Result<ListResponse<ExchangeRate>> {
        let url = self.url(EXCHANGE_RATES_PATH);
        let query = self.auth_query()?;
        let body = serde_json::json!({ "date": chrono::Utc::now().format("%Y-%m").to_string() });

        let (data, total) = self
            .send::<Vec<ExchangeRate>, _>(EXCHANGE_RATES_PATH, || {
                self.client.post(&url).query(&query).json(&body)
            })
            .await?;

        Ok(ListResponse {
            data: data.unwrap_or_default(),
            total,
        })
    }

    async fn close(&self) {
        self.token.write().take();
    }
}

/// First part of a body, cut on a char boundary
fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
