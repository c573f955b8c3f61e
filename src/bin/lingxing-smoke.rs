//! Smoke test entry point.
//!
//! Usage: `lingxing-smoke [CONFIG_PATH]`. Without a path the default config
//! locations are searched.

use anyhow::Context;
use lingxing_smoke::smoke::{self, write_header, write_verdict};
use lingxing_smoke::{ClientOptions, ConfigLoader, HttpSellerApi, LingxingError};
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    match run(&mut stdout).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load config, run the smoke test, and report. `Ok(false)` means the test failed.
async fn run<W: Write>(out: &mut W) -> anyhow::Result<bool> {
    let config = match std::env::args().nth(1) {
        Some(path) => ConfigLoader::load(&path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => ConfigLoader::discover().context("loading configuration")?,
    };

    let errors = config.validate();
    if !errors.is_empty() {
        writeln!(out, "Configuration validation failed:")?;
        for error in &errors {
            writeln!(out, "  - {}", error)?;
        }
        write_verdict(out, &Err(LingxingError::Validation(errors)))?;
        return Ok(false);
    }

    write!(out, "{}", config.summary())?;
    writeln!(out)?;

    let options = ClientOptions::from(&config);
    write_header(out, &options)?;

    let outcome = match HttpSellerApi::new(options) {
        Ok(api) => smoke::run_scoped(&api, out).await,
        Err(e) => Err(e),
    };

    if let Err(e) = &outcome {
        tracing::error!(error = %e, "smoke test failed");
        writeln!(out, "[FAIL] API call failed: {}", e)?;
    }

    write_verdict(out, &outcome)?;
    Ok(outcome.is_ok())
}
