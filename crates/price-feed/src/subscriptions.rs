//! Per-symbol subscription registry
//!
//! Listeners are unbounded channel senders: notification never blocks the
//! refresh loop, and a listener whose receiver is gone is pruned instead of
//! failing the fan-out. Notify iterates a snapshot of the bucket, so
//! concurrent unsubscribes cannot corrupt an in-progress notification.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;
use uuid::Uuid;

use dex_core::{normalize_symbol, PricePoint};

/// Push event delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub symbol: String,
    pub price_usd: f64,
}

/// Opaque token identifying one listener's interest in one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionHandle {
    id: Uuid,
    symbol: String,
}

impl SubscriptionHandle {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

#[derive(Clone)]
struct Subscriber {
    id: Uuid,
    tx: UnboundedSender<PriceUpdate>,
}

/// Symbol-keyed listener buckets with add / remove-one / fan-out notify.
#[derive(Default)]
pub struct SubscriptionRegistry {
    buckets: DashMap<String, Vec<Subscriber>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Register a listener for a symbol.
    pub fn subscribe(
        &self,
        symbol: &str,
        tx: UnboundedSender<PriceUpdate>,
    ) -> SubscriptionHandle {
        let symbol = normalize_symbol(symbol);
        let id = Uuid::new_v4();

        self.buckets
            .entry(symbol.clone())
            .or_default()
            .push(Subscriber { id, tx });

        trace!("subscribed {} to {}", id, symbol);
        SubscriptionHandle { id, symbol }
    }

    /// Remove one listener. Idempotent: unsubscribing twice is a no-op.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) {
        if let Some(mut bucket) = self.buckets.get_mut(&handle.symbol) {
            bucket.retain(|subscriber| subscriber.id != handle.id);
        }
        // Removing the last listener frees the symbol's bucket
        self.buckets
            .remove_if(&handle.symbol, |_, bucket| bucket.is_empty());
    }

    /// Fan a price point out to every live listener of its symbol.
    ///
    /// Returns the number of listeners reached. Listeners whose channel is
    /// closed are pruned afterwards.
    pub fn notify(&self, point: &PricePoint) -> usize {
        let Some(bucket) = self.buckets.get(&point.symbol) else {
            return 0;
        };
        let snapshot: Vec<Subscriber> = bucket.value().clone();
        drop(bucket);

        let update = PriceUpdate {
            symbol: point.symbol.clone(),
            price_usd: point.price_usd,
        };

        let mut delivered = 0;
        let mut dead: Vec<Uuid> = Vec::new();
        for subscriber in &snapshot {
            if subscriber.tx.send(update.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(subscriber.id);
            }
        }

        if !dead.is_empty() {
            if let Some(mut bucket) = self.buckets.get_mut(&point.symbol) {
                bucket.retain(|subscriber| !dead.contains(&subscriber.id));
            }
            self.buckets
                .remove_if(&point.symbol, |_, bucket| bucket.is_empty());
        }

        delivered
    }

    pub fn subscriber_count(&self, symbol: &str) -> usize {
        self.buckets
            .get(&normalize_symbol(symbol))
            .map(|bucket| bucket.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_notify_reaches_every_listener_once() {
        let registry = SubscriptionRegistry::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();

        registry.subscribe("ETH", tx_a);
        registry.subscribe("ETH", tx_b);

        let delivered = registry.notify(&PricePoint::new("ETH", 3000.0));
        assert_eq!(delivered, 2);

        assert_eq!(rx_a.recv().await.unwrap().price_usd, 3000.0);
        assert_eq!(rx_b.recv().await.unwrap().price_usd, 3000.0);
        // Exactly once per cycle
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unsubscribed_listener_is_never_invoked_again() {
        let registry = SubscriptionRegistry::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();

        let handle_a = registry.subscribe("ETH", tx_a);
        registry.subscribe("ETH", tx_b);

        registry.unsubscribe(&handle_a);
        registry.notify(&PricePoint::new("ETH", 3000.0));

        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.recv().await.unwrap().symbol, "ETH");
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let registry = SubscriptionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let handle = registry.subscribe("ETH", tx);
        registry.unsubscribe(&handle);
        registry.unsubscribe(&handle);

        assert_eq!(registry.subscriber_count("ETH"), 0);
    }

    #[test]
    fn test_removing_last_listener_frees_bucket() {
        let registry = SubscriptionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let handle = registry.subscribe("ETH", tx);
        assert_eq!(registry.subscriber_count("ETH"), 1);
        registry.unsubscribe(&handle);
        assert!(registry.buckets.is_empty());
    }

    #[test]
    fn test_closed_channel_is_pruned_on_notify() {
        let registry = SubscriptionRegistry::new();
        let (tx, rx) = mpsc::unbounded_channel();

        registry.subscribe("ETH", tx);
        drop(rx);

        let delivered = registry.notify(&PricePoint::new("ETH", 3000.0));
        assert_eq!(delivered, 0);
        assert_eq!(registry.subscriber_count("ETH"), 0);
    }

    #[test]
    fn test_notify_without_subscribers() {
        let registry = SubscriptionRegistry::new();
        assert_eq!(registry.notify(&PricePoint::new("ETH", 3000.0)), 0);
    }
}
