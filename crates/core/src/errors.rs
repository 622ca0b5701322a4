//! Error types

use thiserror::Error;

/// Price-feed errors surfaced to quote and price requesters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceFeedError {
    #[error("price not available for {0}")]
    PriceUnavailable(String),

    #[error("cached price for {0} is zero")]
    ZeroPrice(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Upstream source errors; recovered locally by the fallback chain,
/// never surfaced past the refresh loop
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("symbol not listed: {0}")]
    MissingSymbol(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid price {price} for {symbol}")]
    InvalidPrice { symbol: String, price: f64 },
}

/// Document store errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("token not found: {0}")]
    TokenNotFound(String),

    #[error("pool not found: {0}")]
    PoolNotFound(String),

    #[error("duplicate token: {0}")]
    DuplicateToken(String),

    #[error("pool references unknown token: {0}")]
    UnknownToken(String),

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

/// Result type alias
pub type PriceFeedResult<T> = Result<T, PriceFeedError>;
pub type SourceResult<T> = Result<T, SourceError>;
pub type StoreResult<T> = Result<T, StoreError>;
