//! Smoke Runner
//!
//! Calls every seller data endpoint once, in order, and reports what came back.
//! Token fetch, sellers, and marketplaces must succeed; exchange rates and the
//! token refresh only produce warnings when they fail.

use crate::client::SellerDataApi;
use crate::error::Result;
use crate::smoke::report;
use std::io::Write;

/// Characters of a token shown in output
const TOKEN_PREFIX: usize = 8;

/// Outcome of a run that got past the required steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmokeSummary {
    /// Lifetime of the first token, in seconds
    pub token_expires_in: u64,

    /// Number of sellers listed
    pub sellers: usize,

    /// Number of marketplaces listed
    pub marketplaces: usize,

    /// Number of exchange rates, `None` if that call failed
    pub exchange_rates: Option<usize>,

    /// Whether the token refresh worked
    pub token_refreshed: bool,

    /// Failures of optional steps
    pub warnings: Vec<String>,
}

impl SmokeSummary {
    /// Check if every step, optional ones included, succeeded
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Run the smoke sequence, then close the client whatever the result
pub async fn run_scoped<A, W>(api: &A, out: &mut W) -> Result<SmokeSummary>
where
    A: SellerDataApi + ?Sized,
    W: Write,
{
    let result = run(api, out).await;
    api.close().await;
    result
}

/// Run the smoke sequence.
///
/// Returns `Err` on the first failed required step.
pub async fn run<A, W>(api: &A, out: &mut W) -> Result<SmokeSummary>
where
    A: SellerDataApi + ?Sized,
    W: Write,
{
    let mut summary = SmokeSummary::default();

    writeln!(out, "1. Fetching access token...")?;
    tracing::info!("fetching access token");
    let token = api.access_token().await?;
    summary.token_expires_in = token.expires_in;
    writeln!(out, "[SUCCESS] Access token acquired")?;
    writeln!(out, "   Expires in: {} s", token.expires_in)?;
    writeln!(out, "   Token prefix: {}...", token.prefix(TOKEN_PREFIX))?;
    writeln!(out)?;

    writeln!(out, "2. Listing sellers...")?;
    tracing::info!("listing sellers");
    let sellers = api.sellers().await?;
    summary.sellers = sellers.len();
    writeln!(out, "[SUCCESS] Got {} sellers", sellers.len())?;
    writeln!(out)?;
    report::write_sellers(out, &sellers.data)?;

    writeln!(out, "3. Listing marketplaces...")?;
    tracing::info!("listing marketplaces");
    let marketplaces = api.marketplaces().await?;
    summary.marketplaces = marketplaces.len();
    writeln!(out, "[SUCCESS] Got {} marketplaces", marketplaces.len())?;
    writeln!(out)?;
    report::write_marketplaces(out, &marketplaces.data)?;

    writeln!(out)?;
    writeln!(out, "4. Listing exchange rates...")?;
    tracing::info!("listing exchange rates");
    match api.exchange_rates().await {
        Ok(rates) => {
            summary.exchange_rates = Some(rates.len());
            writeln!(out, "[SUCCESS] Got {} exchange rates", rates.len())?;
            report::write_rates(out, &rates.data)?;
        }
        Err(e) => {
            tracing::warn!(error = %e, "exchange rates unavailable");
            writeln!(out, "[WARN] Exchange rates failed: {}", e)?;
            summary.warnings.push(format!("exchange rates: {}", e));
        }
    }
    writeln!(out)?;

    writeln!(out, "5. Refreshing access token...")?;
    tracing::info!("refreshing access token");
    match api.refresh_token(&token.refresh_token).await {
        Ok(fresh) => {
            summary.token_refreshed = true;
            writeln!(out, "[SUCCESS] Token refreshed")?;
            writeln!(out, "   New token prefix: {}...", fresh.prefix(TOKEN_PREFIX))?;
            writeln!(out, "   Expires in: {} s", fresh.expires_in)?;
        }
        Err(e) => {
            tracing::warn!(error = %e, "token refresh failed");
            writeln!(out, "[WARN] Token refresh failed: {}", e)?;
            summary.warnings.push(format!("token refresh: {}", e));
        }
    }
    writeln!(out)?;

    report::write_summary(out, &summary)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AccessToken, ExchangeRate, ListResponse, Marketplace, Seller};
    use crate::error::LingxingError;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Scripted in-memory client
    #[derive(Default)]
    struct FakeApi {
        fail_token: bool,
        fail_sellers: bool,
        fail_marketplaces: bool,
        fail_rates: bool,
        fail_refresh: bool,
        sellers: usize,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn record(&self, call: &str) {
            self.calls.lock().push(call.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }

        fn token(access: &str) -> AccessToken {
            AccessToken {
                access_token: access.to_string(),
                refresh_token: "refresh-1".to_string(),
                expires_in: 7200,
            }
        }
    }

    #[async_trait]
    impl SellerDataApi for FakeApi {
        async fn access_token(&self) -> Result<AccessToken> {
            self.record("access_token");
            if self.fail_token {
                return Err(LingxingError::Auth("bad credentials".to_string()));
            }
            Ok(Self::token("first-token-value"))
        }

        async fn refresh_token(&self, refresh_token: &str) -> Result<AccessToken> {
            self.record(&format!("refresh_token:{}", refresh_token));
            if self.fail_refresh {
                return Err(LingxingError::Api {
                    code: "2001005".to_string(),
                    message: "refresh token expired".to_string(),
                });
            }
            Ok(Self::token("second-token-value"))
        }

        async fn sellers(&self) -> Result<ListResponse<Seller>> {
            self.record("sellers");
            if self.fail_sellers {
                return Err(LingxingError::Timeout("sellers".to_string()));
            }
            Ok(ListResponse::new(vec![Seller::default(); self.sellers]))
        }

        async fn marketplaces(&self) -> Result<ListResponse<Marketplace>> {
            self.record("marketplaces");
            if self.fail_marketplaces {
                return Err(LingxingError::Api {
                    code: "500".to_string(),
                    message: "marketplace service unavailable".to_string(),
                });
            }
            Ok(ListResponse::new(vec![Marketplace::default(); 3]))
        }

        async fn exchange_rates(&self) -> Result<ListResponse<ExchangeRate>> {
            self.record("exchange_rates");
            if self.fail_rates {
                return Err(LingxingError::RateLimited { retries: 3 });
            }
            Ok(ListResponse::new(vec![ExchangeRate {
                date: "2026-10".to_string(),
                from_currency: "USD".to_string(),
                to_currency: "CNY".to_string(),
                rate: "7.1".to_string(),
            }]))
        }

        async fn close(&self) {
            self.record("close");
        }
    }

    #[tokio::test]
    async fn test_full_run_in_order() {
        let api = FakeApi {
            sellers: 2,
            ..Default::default()
        };
        let mut out = Vec::new();

        let summary = run_scoped(&api, &mut out).await.unwrap();

        assert_eq!(
            api.calls(),
            vec![
                "access_token",
                "sellers",
                "marketplaces",
                "exchange_rates",
                "refresh_token:refresh-1",
                "close",
            ]
        );
        assert_eq!(summary.token_expires_in, 7200);
        assert_eq!(summary.sellers, 2);
        assert_eq!(summary.marketplaces, 3);
        assert_eq!(summary.exchange_rates, Some(1));
        assert!(summary.token_refreshed);
        assert!(summary.is_clean());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Token prefix: first-to..."));
        assert!(text.contains("USD -> CNY = 7.1"));
        assert!(text.contains("[SUCCESS] All API calls completed"));
    }

    #[tokio::test]
    async fn test_exchange_rate_failure_is_soft() {
        let api = FakeApi {
            fail_rates: true,
            ..Default::default()
        };
        let mut out = Vec::new();

        let summary = run_scoped(&api, &mut out).await.unwrap();

        assert_eq!(summary.exchange_rates, None);
        assert!(summary.token_refreshed);
        assert_eq!(summary.warnings.len(), 1);
        assert!(api.calls().contains(&"refresh_token:refresh-1".to_string()));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[WARN] Exchange rates failed"));
        assert!(!text.contains("Exchange rates: "));
    }

    #[tokio::test]
    async fn test_refresh_failure_is_soft() {
        let api = FakeApi {
            fail_refresh: true,
            ..Default::default()
        };
        let mut out = Vec::new();

        let summary = run_scoped(&api, &mut out).await.unwrap();

        assert!(!summary.token_refreshed);
        assert_eq!(summary.exchange_rates, Some(1));
        assert!(summary.warnings[0].contains("refresh token expired"));
    }

    #[tokio::test]
    async fn test_token_failure_aborts_and_closes() {
        let api = FakeApi {
            fail_token: true,
            ..Default::default()
        };
        let mut out = Vec::new();

        let result = run_scoped(&api, &mut out).await;

        assert!(matches!(result, Err(LingxingError::Auth(_))));
        assert_eq!(api.calls(), vec!["access_token", "close"]);
    }

    #[tokio::test]
    async fn test_seller_failure_aborts() {
        let api = FakeApi {
            fail_sellers: true,
            ..Default::default()
        };
        let mut out = Vec::new();

        let result = run_scoped(&api, &mut out).await;

        assert!(matches!(result, Err(LingxingError::Timeout(_))));
        assert_eq!(api.calls(), vec!["access_token", "sellers", "close"]);
    }

    #[tokio::test]
    async fn test_marketplace_failure_aborts() {
        let api = FakeApi {
            fail_marketplaces: true,
            ..Default::default()
        };
        let mut out = Vec::new();

        let result = run_scoped(&api, &mut out).await;

        assert!(matches!(result, Err(LingxingError::Api { .. })));
        assert_eq!(
            api.calls(),
            vec!["access_token", "sellers", "marketplaces", "close"]
        );
    }

    #[tokio::test]
    async fn test_runs_through_trait_object() {
        let api: Box<dyn SellerDataApi> = Box::new(FakeApi::default());
        let mut out = Vec::new();
        let summary = run_scoped(api.as_ref(), &mut out).await.unwrap();
        assert_eq!(summary.sellers, 0);
    }
}
