//! API Module
//!
//! Response types of the seller data API.

pub mod models;

pub use models::{AccessToken, ExchangeRate, ListResponse, Marketplace, Seller};
