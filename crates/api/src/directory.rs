//! Token directory adapter
//!
//! Bridges the token store into the price-feed crate's `TokenDirectory`
//! seam, keeping the store out of that crate's dependency graph.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use dex_price_feed::TokenDirectory;
use dex_store::TokenStore;

pub struct StoreDirectory {
    tokens: Arc<TokenStore>,
}

impl StoreDirectory {
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        Self { tokens }
    }
}

impl TokenDirectory for StoreDirectory {
    fn symbols(&self) -> Vec<String> {
        self.tokens.symbols()
    }

    fn record_price(&self, symbol: &str, price_usd: f64, at: DateTime<Utc>) {
        // A token removed mid-cycle is not an error worth surfacing
        if let Err(e) = self.tokens.set_price(symbol, price_usd, at) {
            debug!("price write-back skipped: {}", e);
        }
    }
}
