//! Client Module
//!
//! Seller data API client seam, its options, and the HTTP implementation.

pub mod http;
pub mod options;
pub mod rate_limit;
pub mod traits;

pub use http::HttpSellerApi;
pub use options::ClientOptions;
pub use rate_limit::LimitPolicy;
pub use traits::SellerDataApi;
