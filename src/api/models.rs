//! Response Models
//!
//! Records returned by the seller data API.

use serde::{Deserialize, Deserializer, Serialize};

/// Access token issued by the auth server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    /// Bearer token for data calls
    pub access_token: String,

    /// Token used to obtain a fresh access token
    pub refresh_token: String,

    /// Lifetime in seconds
    #[serde(deserialize_with = "u64_lenient")]
    pub expires_in: u64,
}

impl AccessToken {
    /// Leading characters of the access token, safe to print
    pub fn prefix(&self, len: usize) -> String {
        self.access_token.chars().take(len).collect()
    }
}

/// A list call result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListResponse<T> {
    /// Returned records
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,

    /// Total record count, when the gateway reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl<T> ListResponse<T> {
    /// Wrap records without a total
    pub fn new(data: Vec<T>) -> Self {
        Self { data, total: None }
    }

    /// Number of returned records
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if no records were returned
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A seller account (shop)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Seller {
    /// Shop ID
    #[serde(deserialize_with = "u64_lenient")]
    pub sid: u64,

    /// Shop name
    #[serde(alias = "name")]
    pub seller_name: String,

    /// Amazon seller ID
    pub seller_id: String,

    /// Seller account name
    pub account_name: String,

    /// Country
    pub country: String,

    /// Marketplace region
    pub region: String,

    /// Marketplace ID
    pub marketplace_id: String,

    /// Account status code
    #[serde(deserialize_with = "string_lenient")]
    pub status: String,

    /// Whether advertising is authorized
    #[serde(alias = "has_ads_setting", deserialize_with = "bool_lenient")]
    pub ads_authorized: bool,
}

/// An Amazon marketplace
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Marketplace {
    /// Marketplace numeric ID
    #[serde(deserialize_with = "u64_lenient")]
    pub mid: u64,

    /// Region (NA, EU, FE)
    pub region: String,

    /// AWS region
    #[serde(alias = "aws_region")]
    pub region_aws: String,

    /// Country name
    pub country: String,

    /// Country code
    #[serde(alias = "code")]
    pub country_code: String,

    /// Amazon marketplace ID
    pub marketplace_id: String,
}

/// A monthly exchange rate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeRate {
    /// Month the rate applies to (YYYY-MM)
    #[serde(default)]
    pub date: String,

    /// Source currency code
    #[serde(alias = "code")]
    pub from_currency: String,

    /// Target currency code
    #[serde(default = "default_to_currency")]
    pub to_currency: String,

    /// Rate as reported, kept textual to avoid rounding
    #[serde(alias = "rate_org", deserialize_with = "string_lenient")]
    pub rate: String,
}

fn default_to_currency() -> String {
    "CNY".to_string()
}

/// Accept a JSON string or number as a string
fn string_lenient<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Accept a JSON number or numeric string as u64
fn u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("expected unsigned integer, got {}", n))),
        serde_json::Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected unsigned integer, got {:?}", s))),
        serde_json::Value::Null => Ok(0),
        other => Err(D::Error::custom(format!(
            "expected unsigned integer, got {}",
            other
        ))),
    }
}

/// Accept a JSON bool or 0/1 flag
fn bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64().is_some_and(|v| v != 0),
        serde_json::Value::String(s) => matches!(s.as_str(), "1" | "true"),
        _ => false,
    })
}
