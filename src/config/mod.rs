//! Configuration Module
//!
//! Handles loading, validating, and summarizing the config file.

pub mod loader;
pub mod settings;

pub use loader::{ConfigLoader, ConfigStore};
pub use settings::Config;
