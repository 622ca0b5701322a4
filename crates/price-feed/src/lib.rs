//! Price aggregation and swap quoting
//!
//! Features:
//! - Ordered fallback chain of upstream price sources
//! - Lock-free concurrent price cache
//! - Per-symbol subscription fan-out
//! - Cancellable periodic refresh loop
//! - Swap quotes computed from cached prices

pub mod cache;
pub mod quote;
pub mod refresher;
pub mod service;
pub mod sources;
pub mod subscriptions;

pub use cache::PriceCache;
pub use quote::calculate_swap;
pub use refresher::{PriceRefresher, TokenDirectory};
pub use service::{PriceFeedConfig, PriceService};
pub use sources::{default_sources, BinanceSource, CoinGeckoSource, PriceSource};
pub use subscriptions::{PriceUpdate, SubscriptionHandle, SubscriptionRegistry};
