//! Client Abstraction
//!
//! The narrow call surface the smoke runner needs from a seller data API client.

use crate::api::{AccessToken, ExchangeRate, ListResponse, Marketplace, Seller};
use crate::error::Result;
use async_trait::async_trait;

/// Seller data API operations.
///
/// Implemented by [`crate::client::HttpSellerApi`] for real gateways and by
/// in-memory fakes in tests.
#[async_trait]
pub trait SellerDataApi: Send + Sync {
    /// Acquire an access token with the configured credentials
    async fn access_token(&self) -> Result<AccessToken>;

    /// Exchange a refresh token for a new access token
    async fn refresh_token(&self, refresh_token: &str) -> Result<AccessToken>;

    /// List seller accounts (shops)
    async fn sellers(&self) -> Result<ListResponse<Seller>>;

    /// List marketplaces
    async fn marketplaces(&self) -> Result<ListResponse<Marketplace>>;

    /// List exchange rates for the current month
    async fn exchange_rates(&self) -> Result<ListResponse<ExchangeRate>>;

    /// Release held resources. Called once when the client is no longer used.
    async fn close(&self) {}
}
