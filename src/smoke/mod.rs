//! Smoke Test Module
//!
//! End-to-end check of a seller data API client.

pub mod report;
pub mod runner;

pub use report::{write_header, write_verdict};
pub use runner::{run, run_scoped, SmokeSummary};
