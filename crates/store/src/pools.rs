//! Pool collection

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use dex_core::{Pool, PoolStats, PriceRange, StoreError, StoreResult};

use crate::tokens::TokenStore;

/// Creation payload for a pool, validated before a record is built.
#[derive(Debug, Clone)]
pub struct NewPool {
    pub token_a: String,
    pub token_b: String,
    pub fee: f64,
    pub liquidity: f64,
    pub price_range: Option<PriceRange>,
}

/// Pool records keyed by id; token references are checked against the
/// token store at creation.
pub struct PoolStore {
    pools: DashMap<Uuid, Pool>,
    tokens: Arc<TokenStore>,
}

impl PoolStore {
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        Self {
            pools: DashMap::new(),
            tokens,
        }
    }

    pub fn insert(&self, new_pool: NewPool) -> StoreResult<Pool> {
        self.validate(&new_pool)?;

        let mut pool = Pool::new(
            &new_pool.token_a,
            &new_pool.token_b,
            new_pool.fee,
            new_pool.liquidity,
        );
        if let Some(range) = new_pool.price_range {
            pool = pool.with_price_range(range);
        }

        debug!("pool {}/{} created ({})", pool.token_a, pool.token_b, pool.id);
        self.pools.insert(pool.id, pool.clone());
        Ok(pool)
    }

    fn validate(&self, new_pool: &NewPool) -> StoreResult<()> {
        for symbol in [&new_pool.token_a, &new_pool.token_b] {
            if !self.tokens.contains(symbol) {
                return Err(StoreError::UnknownToken(symbol.clone()));
            }
        }
        if dex_core::normalize_symbol(&new_pool.token_a)
            == dex_core::normalize_symbol(&new_pool.token_b)
        {
            return Err(StoreError::Validation {
                field: "tokenB",
                reason: "pool tokens must differ".to_string(),
            });
        }
        if !new_pool.fee.is_finite() || new_pool.fee < 0.0 {
            return Err(StoreError::Validation {
                field: "fee",
                reason: format!("must be non-negative, got {}", new_pool.fee),
            });
        }
        if !new_pool.liquidity.is_finite() || new_pool.liquidity < 0.0 {
            return Err(StoreError::Validation {
                field: "liquidity",
                reason: format!("must be non-negative, got {}", new_pool.liquidity),
            });
        }
        if let Some(range) = &new_pool.price_range {
            if range.min > range.max {
                return Err(StoreError::Validation {
                    field: "priceRange",
                    reason: format!("min {} exceeds max {}", range.min, range.max),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Option<Pool> {
        self.pools.get(&id).map(|entry| entry.value().clone())
    }

    /// All records, newest first.
    pub fn list(&self) -> Vec<Pool> {
        let mut pools: Vec<Pool> = self
            .pools
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        pools.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        pools
    }

    pub fn stats(&self, id: Uuid) -> StoreResult<PoolStats> {
        self.get(id)
            .map(|pool| pool.stats())
            .ok_or_else(|| StoreError::PoolNotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
