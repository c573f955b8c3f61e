//! Console Report
//!
//! Human-readable rendering of smoke run progress and results.

use crate::api::{ExchangeRate, Marketplace, Seller};
use crate::client::ClientOptions;
use crate::error::LingxingError;
use crate::smoke::SmokeSummary;
use std::io::{self, Write};

/// Sellers printed in detail
pub const SELLERS_SHOWN: usize = 5;

/// Marketplaces printed in detail
pub const MARKETPLACES_SHOWN: usize = 10;

/// Exchange rates printed
pub const RATES_SHOWN: usize = 5;

const WIDTH: usize = 70;

fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(WIDTH).collect()
}

/// Banner with run time and connection settings
pub fn write_header<W: Write>(out: &mut W, options: &ClientOptions) -> io::Result<()> {
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "Lingxing API smoke test")?;
    writeln!(out, "{}", rule('='))?;
    writeln!(
        out,
        "Started: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "AppID: {}", options.app_id)?;
    writeln!(out, "Gateway: {}", options.base_url)?;
    writeln!(out, "Proxy: {}", options.proxy.as_deref().unwrap_or("none"))?;
    writeln!(out, "{}", rule('-'))?;
    Ok(())
}

pub(crate) fn write_sellers<W: Write>(out: &mut W, sellers: &[Seller]) -> io::Result<()> {
    writeln!(out, "Seller details:")?;
    writeln!(out, "{}", rule('-'))?;
    for (i, seller) in sellers.iter().take(SELLERS_SHOWN).enumerate() {
        writeln!(out, "Seller {}:", i + 1)?;
        writeln!(out, "  ID: {}", seller.sid)?;
        writeln!(out, "  Name: {}", seller.seller_name)?;
        writeln!(out, "  Seller ID: {}", seller.seller_id)?;
        writeln!(out, "  Account: {}", seller.account_name)?;
        writeln!(out, "  Country: {}", seller.country)?;
        writeln!(out, "  Region: {}", seller.region)?;
        writeln!(out, "  Marketplace ID: {}", seller.marketplace_id)?;
        writeln!(out, "  Status: {}", seller.status)?;
        writeln!(out, "  Ads authorized: {}", seller.ads_authorized)?;
        writeln!(out)?;
    }

    if sellers.len() > SELLERS_SHOWN {
        writeln!(
            out,
            "... {} more sellers not shown",
            sellers.len() - SELLERS_SHOWN
        )?;
        writeln!(out)?;
    }
    Ok(())
}

pub(crate) fn write_marketplaces<W: Write>(
    out: &mut W,
    marketplaces: &[Marketplace],
) -> io::Result<()> {
    writeln!(out, "Marketplace details:")?;
    writeln!(out, "{}", rule('-'))?;
    for (i, marketplace) in marketplaces.iter().take(MARKETPLACES_SHOWN).enumerate() {
        writeln!(out, "Marketplace {}:", i + 1)?;
        writeln!(out, "  ID: {}", marketplace.mid)?;
        writeln!(out, "  Region: {}", marketplace.region)?;
        writeln!(out, "  AWS region: {}", marketplace.region_aws)?;
        writeln!(out, "  Country: {}", marketplace.country)?;
        writeln!(out, "  Country code: {}", marketplace.country_code)?;
        writeln!(out, "  Marketplace ID: {}", marketplace.marketplace_id)?;
        writeln!(out)?;
    }

    if marketplaces.len() > MARKETPLACES_SHOWN {
        writeln!(
            out,
            "... {} more marketplaces not shown",
            marketplaces.len() - MARKETPLACES_SHOWN
        )?;
    }
    Ok(())
}

pub(crate) fn write_rates<W: Write>(out: &mut W, rates: &[ExchangeRate]) -> io::Result<()> {
    if rates.is_empty() {
        writeln!(out, "  No exchange rates")?;
        return Ok(());
    }

    writeln!(out, "Exchange rates (first {}):", RATES_SHOWN)?;
    writeln!(out, "{}", rule('-'))?;
    for rate in rates.iter().take(RATES_SHOWN) {
        writeln!(
            out,
            "  {}: {} -> {} = {}",
            rate.date, rate.from_currency, rate.to_currency, rate.rate
        )?;
    }
    Ok(())
}

pub(crate) fn write_summary<W: Write>(out: &mut W, summary: &SmokeSummary) -> io::Result<()> {
    writeln!(out, "{}", rule('='))?;
    if summary.warnings.is_empty() {
        writeln!(out, "[SUCCESS] All API calls completed")?;
    } else {
        writeln!(
            out,
            "[SUCCESS] Required API calls completed ({} warning(s))",
            summary.warnings.len()
        )?;
    }
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "Results:")?;
    writeln!(out, "  Access token: valid for {} s", summary.token_expires_in)?;
    writeln!(out, "  Sellers: {}", summary.sellers)?;
    writeln!(out, "  Marketplaces: {}", summary.marketplaces)?;
    if let Some(rates) = summary.exchange_rates {
        writeln!(out, "  Exchange rates: {}", rates)?;
    }
    writeln!(
        out,
        "  Token refresh: {}",
        if summary.token_refreshed { "ok" } else { "failed" }
    )?;
    for warning in &summary.warnings {
        writeln!(out, "  [WARN] {}", warning)?;
    }
    writeln!(out, "{}", rule('='))?;
    Ok(())
}

/// Final pass/fail block
pub fn write_verdict<W: Write>(
    out: &mut W,
    outcome: &Result<SmokeSummary, LingxingError>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "Smoke test finished")?;
    writeln!(out, "{}", rule('='))?;
    match outcome {
        Ok(_) => {
            writeln!(out, "[SUCCESS] Lingxing API smoke test passed.")?;
            writeln!(out, "Credentials, proxy, and API access all work.")?;
        }
        Err(e) => {
            writeln!(out, "[FAIL] Lingxing API smoke test failed: {}", e)?;
            writeln!(out, "Check the configuration, the proxy, and network access.")?;
        }
    }
    writeln!(out, "{}", rule('='))?;
    Ok(())
}
