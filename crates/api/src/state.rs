//! Shared application state

use std::sync::Arc;

use dex_price_feed::PriceService;
use dex_store::{PoolStore, TokenStore};

/// Handles shared by every request handler and the WebSocket bridge.
#[derive(Clone)]
pub struct AppState {
    pub price: Arc<PriceService>,
    pub tokens: Arc<TokenStore>,
    pub pools: Arc<PoolStore>,
}
