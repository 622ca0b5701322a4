//! REST + WebSocket surface for the DEX backend
//!
//! Thin boundary layer: request validation, error-to-status mapping, and the
//! WebSocket bridge onto the price subscription registry. All domain logic
//! lives in `dex-price-feed` and `dex-store`.

pub mod directory;
pub mod error;
pub mod routes;
pub mod state;
pub mod ws;

pub use directory::StoreDirectory;
pub use routes::create_router;
pub use state::AppState;
