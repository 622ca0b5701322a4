//! Price service facade
//!
//! The single owned instance wiring cache, registry, sources, and the
//! refresh loop together. Constructed once at process start and injected
//! into every consumer; tests build isolated instances per case.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc::UnboundedSender, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use dex_core::{PriceFeedResult, PricePoint, SwapQuote};

use crate::cache::PriceCache;
use crate::quote;
use crate::refresher::{PriceRefresher, TokenDirectory};
use crate::sources::PriceSource;
use crate::subscriptions::{PriceUpdate, SubscriptionHandle, SubscriptionRegistry};

/// Price service configuration
#[derive(Debug, Clone)]
pub struct PriceFeedConfig {
    pub update_interval: Duration,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(10),
        }
    }
}

/// Process-wide price service.
pub struct PriceService {
    config: PriceFeedConfig,
    cache: Arc<PriceCache>,
    registry: Arc<SubscriptionRegistry>,
    directory: Arc<dyn TokenDirectory>,
    // Consumed when the refresh loop starts
    sources: Mutex<Option<Vec<Box<dyn PriceSource>>>>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PriceService {
    pub fn new(
        config: PriceFeedConfig,
        sources: Vec<Box<dyn PriceSource>>,
        directory: Arc<dyn TokenDirectory>,
    ) -> Self {
        Self {
            config,
            cache: Arc::new(PriceCache::new()),
            registry: Arc::new(SubscriptionRegistry::new()),
            directory,
            sources: Mutex::new(Some(sources)),
            shutdown: Mutex::new(None),
            task: Mutex::new(None),
        }
    }

    /// Get shared cache reference
    pub fn cache(&self) -> Arc<PriceCache> {
        Arc::clone(&self.cache)
    }

    /// Get shared registry reference
    pub fn registry(&self) -> Arc<SubscriptionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Spawn the refresh loop. Idempotent: a second call is a no-op.
    pub fn start(&self) {
        let Some(sources) = self.sources.lock().take() else {
            warn!("price service already started");
            return;
        };

        let refresher = PriceRefresher::new(
            Arc::clone(&self.cache),
            Arc::clone(&self.registry),
            sources,
            Arc::clone(&self.directory),
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let period = self.config.update_interval;
        let handle = tokio::spawn(async move {
            refresher.run(period, shutdown_rx).await;
        });

        *self.shutdown.lock() = Some(shutdown_tx);
        *self.task.lock() = Some(handle);
        info!("price service started");
    }

    /// Stop the refresh loop, letting an in-flight cycle finish.
    pub async fn stop(&self) {
        if let Some(shutdown) = self.shutdown.lock().take() {
            let _ = shutdown.send(());
        }

        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("refresh task ended abnormally: {}", e);
            }
        }
        info!("price service stopped");
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().is_some()
    }

    /// Latest cached price for a symbol, if one was ever observed.
    pub fn get_price(&self, symbol: &str) -> Option<PricePoint> {
        self.cache.get(symbol)
    }

    /// Quote a swap from the current cache contents.
    pub fn calculate_swap(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: f64,
    ) -> PriceFeedResult<SwapQuote> {
        quote::calculate_swap(&self.cache, token_in, token_out, amount_in)
    }

    /// Register a listener for a symbol's price updates.
    pub fn subscribe(&self, symbol: &str, tx: UnboundedSender<PriceUpdate>) -> SubscriptionHandle {
        self.registry.subscribe(symbol, tx)
    }

    pub fn unsubscribe(&self, handle: &SubscriptionHandle) {
        self.registry.unsubscribe(handle)
    }

    /// Get statistics
    pub fn stats(&self) -> PriceServiceStats {
        PriceServiceStats {
            tracked_prices: self.cache.len(),
            running: self.is_running(),
        }
    }
}

/// Price service statistics
#[derive(Debug, Clone)]
pub struct PriceServiceStats {
    pub tracked_prices: usize,
    pub running: bool,
}
