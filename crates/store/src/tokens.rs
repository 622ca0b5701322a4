//! Token collection

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use dex_core::{normalize_symbol, StoreError, StoreResult, Token};

/// Token records keyed by symbol; symbol and address are both unique.
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: DashMap<String, Token>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
        }
    }

    /// A store seeded with the well-known mainnet token set.
    pub fn with_defaults() -> Self {
        let store = Self::new();

        let defaults = [
            Token::new(
                "ETH",
                "Ether",
                "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE",
                18,
                "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/ethereum/info/logo.png",
            ),
            Token::new(
                "USDC",
                "USD Coin",
                "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
                6, // NOT 18!
                "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/ethereum/assets/0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48/logo.png",
            ),
            Token::new(
                "USDT",
                "Tether USD",
                "0xdAC17F958D2ee523a2206206994597C13D831ec7",
                6, // NOT 18!
                "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/ethereum/assets/0xdAC17F958D2ee523a2206206994597C13D831ec7/logo.png",
            ),
            Token::new(
                "DAI",
                "Dai Stablecoin",
                "0x6B175474E89094C44Da98b954EedeAC495271d0F",
                18,
                "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/ethereum/assets/0x6B175474E89094C44Da98b954EedeAC495271d0F/logo.png",
            ),
            Token::new(
                "WBTC",
                "Wrapped Bitcoin",
                "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599",
                8,
                "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/ethereum/assets/0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599/logo.png",
            ),
        ];

        for token in defaults {
            store.tokens.insert(token.symbol.clone(), token);
        }
        store
    }

    pub fn insert(&self, token: Token) -> StoreResult<Token> {
        if self.tokens.contains_key(&token.symbol) {
            return Err(StoreError::DuplicateToken(token.symbol));
        }
        if self
            .tokens
            .iter()
            .any(|entry| entry.address.eq_ignore_ascii_case(&token.address))
        {
            return Err(StoreError::DuplicateToken(token.address));
        }

        debug!("token {} added", token.symbol);
        self.tokens.insert(token.symbol.clone(), token.clone());
        Ok(token)
    }

    pub fn get(&self, symbol: &str) -> Option<Token> {
        self.tokens
            .get(&normalize_symbol(symbol))
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.tokens.contains_key(&normalize_symbol(symbol))
    }

    /// All records, sorted by symbol for stable listings.
    pub fn list(&self) -> Vec<Token> {
        let mut tokens: Vec<Token> = self
            .tokens
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        tokens.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        tokens
    }

    pub fn symbols(&self) -> Vec<String> {
        self.tokens.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Write a refreshed price back onto the owning record.
    pub fn set_price(&self, symbol: &str, price_usd: f64, at: DateTime<Utc>) -> StoreResult<()> {
        let mut entry = self
            .tokens
            .get_mut(&normalize_symbol(symbol))
            .ok_or_else(|| StoreError::TokenNotFound(symbol.to_string()))?;
        entry.price_usd = price_usd;
        entry.last_updated = Some(at);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
