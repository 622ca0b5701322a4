//! Swap quote types
//!
//! Quotes are derived fresh from cached prices on every request and never
//! stored. Computation runs in full f64 precision; rounding to the
//! presentation widths (6 decimals for amounts/ratios/prices, 2 for the
//! impact percentage) happens at serialization.

use serde::{Serialize, Serializer};

/// A computed swap quote.
///
/// Wire payload carries fixed-decimal strings, e.g.
/// `{"amountOut":"6000.000000","priceImpact":"0.00",...}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwapQuote {
    #[serde(rename = "amountOut", serialize_with = "fixed6")]
    pub amount_out: f64,
    #[serde(rename = "priceImpact", serialize_with = "fixed2")]
    pub price_impact_pct: f64,
    #[serde(rename = "priceRatio", serialize_with = "fixed6")]
    pub price_ratio: f64,
    #[serde(rename = "tokenInPrice", serialize_with = "fixed6")]
    pub token_in_price_usd: f64,
    #[serde(rename = "tokenOutPrice", serialize_with = "fixed6")]
    pub token_out_price_usd: f64,
}

impl SwapQuote {
    /// Compute a quote from two cached USD prices.
    ///
    /// Callers must have validated `amount_in` (finite, non-negative) and
    /// `token_in_price_usd > 0`; see `dex-price-feed`'s `calculate_swap`.
    ///
    /// The impact formula compares `amount_out` against a spot-price
    /// projection. With `spot == price_ratio` and no depth model it always
    /// evaluates to ~0; the shape is kept so a depth model can slot in.
    pub fn compute(amount_in: f64, token_in_price_usd: f64, token_out_price_usd: f64) -> Self {
        let price_ratio = token_out_price_usd / token_in_price_usd;
        let amount_out = amount_in * price_ratio;

        let spot_price = price_ratio;
        let price_impact_pct = if amount_in == 0.0 {
            0.0
        } else {
            ((amount_out - amount_in * spot_price) / (amount_in * spot_price)).abs() * 100.0
        };

        Self {
            amount_out,
            price_impact_pct,
            price_ratio,
            token_in_price_usd,
            token_out_price_usd,
        }
    }
}

fn fixed6<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.6}"))
}

fn fixed2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}
