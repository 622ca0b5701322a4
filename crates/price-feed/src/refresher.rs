//! Periodic price refresh loop
//!
//! One cycle walks the tracked symbol set, trying each source in order per
//! symbol. The symbol set is re-derived from the directory every cycle, so
//! tokens added at runtime are picked up without a restart. A symbol whose
//! sources all fail keeps its stale cache entry and produces no notification
//! that cycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use dex_core::PricePoint;

use crate::cache::PriceCache;
use crate::sources::PriceSource;
use crate::subscriptions::SubscriptionRegistry;

/// Enumerates the tracked token set and accepts refreshed prices back.
///
/// Implemented over the token store in production; tests inject fixtures.
pub trait TokenDirectory: Send + Sync {
    fn symbols(&self) -> Vec<String>;

    /// Persist a refreshed price on the owning record.
    fn record_price(&self, _symbol: &str, _price_usd: f64, _at: DateTime<Utc>) {}
}

/// The refresh loop: sole writer to the price cache.
pub struct PriceRefresher {
    cache: Arc<PriceCache>,
    registry: Arc<SubscriptionRegistry>,
    sources: Vec<Box<dyn PriceSource>>,
    directory: Arc<dyn TokenDirectory>,
}

impl PriceRefresher {
    pub fn new(
        cache: Arc<PriceCache>,
        registry: Arc<SubscriptionRegistry>,
        sources: Vec<Box<dyn PriceSource>>,
        directory: Arc<dyn TokenDirectory>,
    ) -> Self {
        Self {
            cache,
            registry,
            sources,
            directory,
        }
    }

    /// Run until the shutdown channel fires.
    ///
    /// Skipped ticks (a cycle still in flight when the next tick lands) are
    /// dropped, so two cycles never overlap.
    pub async fn run(self, period: Duration, mut shutdown: oneshot::Receiver<()>) {
        info!("starting price refresh loop, period {:?}", period);

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh_once().await;
                }
                _ = &mut shutdown => {
                    info!("refresh loop shutdown requested");
                    break;
                }
            }
        }
    }

    /// One full refresh cycle over the current token set.
    pub async fn refresh_once(&self) {
        let symbols = self.directory.symbols();
        debug!("refresh cycle over {} symbols", symbols.len());

        for symbol in &symbols {
            self.refresh_symbol(symbol).await;
        }
    }

    /// Refresh one symbol independently of the rest of the cycle.
    async fn refresh_symbol(&self, symbol: &str) {
        for source in &self.sources {
            match source.fetch_price(symbol).await {
                Ok(price_usd) => {
                    let point = PricePoint::new(symbol, price_usd);
                    self.cache.insert(point.clone());
                    self.directory
                        .record_price(&point.symbol, point.price_usd, point.observed_at);

                    // Write-before-notify: subscribers see this cycle's value
                    if let Some(latest) = self.cache.get(&point.symbol) {
                        let delivered = self.registry.notify(&latest);
                        debug!(
                            "{} = {} via {}, notified {}",
                            point.symbol, point.price_usd, source.name(), delivered
                        );
                    }
                    return;
                }
                Err(e) => {
                    debug!("source {} failed for {}: {}", source.name(), symbol, e);
                }
            }
        }

        // Stale-but-available beats absent: keep the old entry, notify nobody
        warn!("no source produced a price for {}", symbol);
    }
}
