//! Core type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalize a ticker symbol to its canonical cache-key form.
///
/// Symbols are short uppercase identifiers ("ETH", "USDC"); the same symbol
/// must map to the same key no matter which upstream source produced it.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Latest observed USD price for one symbol.
///
/// Immutable once created; a refresh replaces the whole entry for its symbol
/// (last-write-wins, no history).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub symbol: String,
    pub price_usd: f64,
    pub observed_at: DateTime<Utc>,
}

impl PricePoint {
    pub fn new(symbol: &str, price_usd: f64) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            price_usd,
            observed_at: Utc::now(),
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.observed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalization() {
        assert_eq!(normalize_symbol("eth"), "ETH");
        assert_eq!(normalize_symbol(" Usdc "), "USDC");
        assert_eq!(normalize_symbol("WBTC"), "WBTC");
    }

    #[test]
    fn test_price_point_normalizes_symbol() {
        let point = PricePoint::new("eth", 3000.0);
        assert_eq!(point.symbol, "ETH");
        assert_eq!(point.price_usd, 3000.0);
    }
}
