//! Concurrent price cache
//!
//! Uses DashMap for key-granular atomic replacement: readers never observe a
//! partially written entry. Absence of a key means "no price ever observed",
//! which callers must treat distinctly from a zero price.

use dashmap::DashMap;

use dex_core::{normalize_symbol, PricePoint};

/// Process-wide mapping from token symbol to the latest observed price.
///
/// Written only by the refresh loop, read by quote requests and
/// notifications. No eviction; bounded by the tracked symbol set.
#[derive(Debug, Default)]
pub struct PriceCache {
    prices: DashMap<String, PricePoint>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self {
            prices: DashMap::new(),
        }
    }

    /// Replace the entry for the point's symbol (last-write-wins).
    pub fn insert(&self, point: PricePoint) {
        self.prices.insert(point.symbol.clone(), point);
    }

    pub fn get(&self, symbol: &str) -> Option<PricePoint> {
        self.prices
            .get(&normalize_symbol(symbol))
            .map(|entry| entry.value().clone())
    }

    pub fn symbols(&self) -> Vec<String> {
        self.prices.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
