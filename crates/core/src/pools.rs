//! Liquidity pool records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::normalize_symbol;

/// Price range for a concentrated-liquidity position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// A liquidity pool record; `token_a`/`token_b` reference tokens by symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub id: Uuid,
    pub token_a: String,
    pub token_b: String,
    pub fee: f64,
    pub liquidity: f64,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub apr: f64,
    #[serde(rename = "volume24h", default)]
    pub volume_24h: f64,
    #[serde(default)]
    pub tvl: f64,
    pub created_at: DateTime<Utc>,
}

impl Pool {
    pub fn new(token_a: &str, token_b: &str, fee: f64, liquidity: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            token_a: normalize_symbol(token_a),
            token_b: normalize_symbol(token_b),
            fee,
            liquidity,
            price_range: None,
            apr: 0.0,
            volume_24h: 0.0,
            tvl: 0.0,
            created_at: Utc::now(),
        }
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            tvl: self.tvl,
            volume_24h: self.volume_24h,
            apr: self.apr,
            price_range: self.price_range,
            liquidity: self.liquidity,
        }
    }
}

/// Derived pool statistics, served by the pool stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    pub tvl: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
    pub apr: f64,
    pub price_range: Option<PriceRange>,
    pub liquidity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_normalizes_symbols() {
        let pool = Pool::new("eth", "usdc", 0.003, 1_000_000.0);
        assert_eq!(pool.token_a, "ETH");
        assert_eq!(pool.token_b, "USDC");
    }

    #[test]
    fn test_stats_projection() {
        let pool = Pool::new("ETH", "USDC", 0.003, 500.0)
            .with_price_range(PriceRange { min: 2000.0, max: 4000.0 });
        let stats = pool.stats();
        assert_eq!(stats.liquidity, 500.0);
        assert_eq!(stats.price_range.unwrap().min, 2000.0);
    }
}
