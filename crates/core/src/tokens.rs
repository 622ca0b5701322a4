//! Token record definitions
//!
//! CRITICAL: Always use correct decimals!
//! - USDC/USDT: 6 decimals (NOT 18!)
//! - WBTC: 8 decimals
//! - Most others: 18 decimals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::normalize_symbol;

/// A tracked token record.
///
/// `price_usd` and `last_updated` are written back by the refresh loop;
/// everything else is set at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub address: String,
    pub decimals: u8,
    #[serde(rename = "logoURI")]
    pub logo_uri: String,
    #[serde(rename = "priceUSD", default)]
    pub price_usd: f64,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Token {
    pub fn new(symbol: &str, name: &str, address: &str, decimals: u8, logo_uri: &str) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            name: name.to_string(),
            address: address.to_string(),
            decimals,
            logo_uri: logo_uri.to_string(),
            price_usd: 0.0,
            last_updated: None,
        }
    }
}

/// Check if token is a stablecoin
pub fn is_stablecoin(symbol: &str) -> bool {
    matches!(
        symbol.to_uppercase().as_str(),
        "USDC" | "USDT" | "DAI" | "FRAX" | "LUSD"
    )
}
