//! lingxing-smoke
//!
//! Loads Lingxing API credentials, proxy, and rate-limit settings from a JSON
//! config file, and runs an end-to-end smoke test against the seller data API.
//!
//! ```no_run
//! use lingxing_smoke::{ClientOptions, ConfigLoader, HttpSellerApi};
//!
//! # async fn demo() -> lingxing_smoke::Result<()> {
//! let config = ConfigLoader::load("config.json")?;
//! config.ensure_valid()?;
//!
//! let api = HttpSellerApi::new(ClientOptions::from(&config))?;
//! let summary = lingxing_smoke::smoke::run_scoped(&api, &mut std::io::stdout()).await?;
//! println!("{} sellers", summary.sellers);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod smoke;

pub use client::{ClientOptions, HttpSellerApi, SellerDataApi};
pub use config::{Config, ConfigLoader, ConfigStore};
pub use error::{LingxingError, Result};
pub use smoke::SmokeSummary;
