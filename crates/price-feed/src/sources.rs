//! Upstream price source implementations
//!
//! Each source owns its own symbol-to-provider-id mapping and its own failure
//! domain: any network error, missing listing, or malformed body becomes a
//! `SourceError` at the trait boundary. The refresh loop tries sources in
//! order and falls through on failure; adding a third source means adding one
//! entry to the list built by `default_sources`.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use dex_core::{normalize_symbol, Settings, SourceError, SourceResult};

/// A single upstream price source.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current USD price for a symbol.
    async fn fetch_price(&self, symbol: &str) -> SourceResult<f64>;

    fn name(&self) -> &'static str;
}

/// Build the production fallback chain: Binance first, CoinGecko second.
pub fn default_sources(settings: &Settings) -> Result<Vec<Box<dyn PriceSource>>, reqwest::Error> {
    let client = Client::builder().timeout(settings.fetch_timeout).build()?;

    Ok(vec![
        Box::new(BinanceSource::new(
            client.clone(),
            settings.binance_api_url.clone(),
        )),
        Box::new(CoinGeckoSource::new(
            client,
            settings.coingecko_api_url.clone(),
            settings.coingecko_api_key.clone(),
        )),
    ])
}

fn validate_price(symbol: &str, price: f64) -> SourceResult<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(SourceError::InvalidPrice {
            symbol: symbol.to_string(),
            price,
        });
    }
    Ok(price)
}

/// Binance exchange ticker source: direct `{SYMBOL}USDT` pair lookup.
pub struct BinanceSource {
    client: Client,
    base_url: String,
}

/// Binance returns the price as a string
#[derive(Debug, Deserialize)]
struct BinanceTicker {
    symbol: String,
    price: String,
}

impl BinanceSource {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn parse_ticker(symbol: &str, ticker: &BinanceTicker) -> SourceResult<f64> {
        let price: f64 = ticker
            .price
            .parse()
            .map_err(|_| SourceError::Malformed(format!("ticker price {:?}", ticker.price)))?;
        validate_price(symbol, price)
    }
}

#[async_trait]
impl PriceSource for BinanceSource {
    async fn fetch_price(&self, symbol: &str) -> SourceResult<f64> {
        let symbol = normalize_symbol(symbol);
        let pair = format!("{symbol}USDT");

        let response = self
            .client
            .get(format!("{}/ticker/price", self.base_url))
            .query(&[("symbol", pair.as_str())])
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        // Binance answers unknown pairs with a 4xx error body
        if !response.status().is_success() {
            return Err(SourceError::MissingSymbol(symbol));
        }

        let ticker: BinanceTicker = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        debug!("binance ticker {} -> {}", ticker.symbol, ticker.price);
        Self::parse_ticker(&symbol, &ticker)
    }

    fn name(&self) -> &'static str {
        "binance"
    }
}

/// CoinGecko aggregator source: symbol mapped to a provider-specific id.
pub struct CoinGeckoSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    ids: HashMap<&'static str, &'static str>,
}

impl CoinGeckoSource {
    pub fn new(client: Client, base_url: String, api_key: Option<String>) -> Self {
        let ids = HashMap::from([
            ("ETH", "ethereum"),
            ("WETH", "weth"),
            ("USDC", "usd-coin"),
            ("USDT", "tether"),
            ("DAI", "dai"),
            ("WBTC", "wrapped-bitcoin"),
        ]);

        Self {
            client,
            base_url,
            api_key,
            ids,
        }
    }

    /// Provider id for a symbol; unmapped symbols fall back to the
    /// lowercased symbol, which is what CoinGecko uses for most listings.
    fn provider_id(&self, symbol: &str) -> String {
        let symbol = normalize_symbol(symbol);
        self.ids
            .get(symbol.as_str())
            .map(|id| id.to_string())
            .unwrap_or_else(|| symbol.to_lowercase())
    }

    fn parse_simple_price(symbol: &str, id: &str, body: &serde_json::Value) -> SourceResult<f64> {
        let price = body
            .get(id)
            .and_then(|entry| entry.get("usd"))
            .ok_or_else(|| SourceError::MissingSymbol(symbol.to_string()))?
            .as_f64()
            .ok_or_else(|| SourceError::Malformed(format!("non-numeric usd price for {id}")))?;
        validate_price(symbol, price)
    }
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    async fn fetch_price(&self, symbol: &str) -> SourceResult<f64> {
        let symbol = normalize_symbol(symbol);
        let id = self.provider_id(&symbol);

        let mut query = vec![("ids", id.clone()), ("vs_currencies", "usd".to_string())];
        if let Some(key) = &self.api_key {
            query.push(("x_cg_demo_api_key", key.clone()));
        }

        let response = self
            .client
            .get(format!("{}/simple/price", self.base_url))
            .query(&query)
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Http(format!("status {}", response.status())));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        Self::parse_simple_price(&symbol, &id, &body)
    }

    fn name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_binance_ticker_parsing() {
        let ticker = BinanceTicker {
            symbol: "ETHUSDT".to_string(),
            price: "3000.50".to_string(),
        };
        assert_eq!(BinanceSource::parse_ticker("ETH", &ticker).unwrap(), 3000.5);
    }

    #[test]
    fn test_binance_rejects_non_numeric_price() {
        let ticker = BinanceTicker {
            symbol: "ETHUSDT".to_string(),
            price: "not-a-price".to_string(),
        };
        assert!(matches!(
            BinanceSource::parse_ticker("ETH", &ticker),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn test_binance_rejects_negative_price() {
        let ticker = BinanceTicker {
            symbol: "ETHUSDT".to_string(),
            price: "-1.0".to_string(),
        };
        assert!(matches!(
            BinanceSource::parse_ticker("ETH", &ticker),
            Err(SourceError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_coingecko_simple_price_parsing() {
        let body = json!({"ethereum": {"usd": 3000.5}});
        assert_eq!(
            CoinGeckoSource::parse_simple_price("ETH", "ethereum", &body).unwrap(),
            3000.5
        );
    }

    #[test]
    fn test_coingecko_missing_symbol() {
        let body = json!({});
        assert!(matches!(
            CoinGeckoSource::parse_simple_price("ETH", "ethereum", &body),
            Err(SourceError::MissingSymbol(_))
        ));
    }

    #[test]
    fn test_coingecko_malformed_price() {
        let body = json!({"ethereum": {"usd": "3000.5"}});
        assert!(matches!(
            CoinGeckoSource::parse_simple_price("ETH", "ethereum", &body),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn test_coingecko_id_mapping() {
        let source = CoinGeckoSource::new(
            Client::new(),
            "https://api.coingecko.example".to_string(),
            None,
        );
        assert_eq!(source.provider_id("USDC"), "usd-coin");
        assert_eq!(source.provider_id("eth"), "ethereum");
        // Unmapped symbols fall back to the lowercase form
        assert_eq!(source.provider_id("PEPE"), "pepe");
    }
}
