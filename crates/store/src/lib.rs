//! In-memory document store for token and pool records
//!
//! Plain CRUD over DashMap-backed collections. The refresh loop enumerates
//! tokens from here each cycle and writes refreshed prices back.

pub mod pools;
pub mod tokens;

pub use pools::{NewPool, PoolStore};
pub use tokens::TokenStore;
