//! REST routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use dex_core::{PriceFeedError, PriceRange, Token};
use dex_store::NewPool;

use crate::error::ApiError;
use crate::state::AppState;
use crate::ws::ws_handler;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/tokens", get(list_tokens).post(create_token))
        .route("/api/tokens/price/{symbol}", get(get_token_price))
        .route("/api/tokens/calculate-swap", axum::routing::post(calculate_swap))
        .route("/api/pools", get(list_pools).post(create_pool))
        .route("/api/pools/{id}/stats", get(get_pool_stats))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn list_tokens(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.tokens.list())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTokenRequest {
    symbol: String,
    name: String,
    address: String,
    decimals: u8,
    #[serde(rename = "logoURI")]
    logo_uri: String,
}

async fn create_token(
    State(state): State<AppState>,
    Json(req): Json<CreateTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    for (field, value) in [
        ("symbol", &req.symbol),
        ("name", &req.name),
        ("address", &req.address),
        ("logoURI", &req.logo_uri),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::bad_request(format!("{field} must not be empty")));
        }
    }

    let token = state.tokens.insert(Token::new(
        &req.symbol,
        &req.name,
        &req.address,
        req.decimals,
        &req.logo_uri,
    ))?;
    Ok((StatusCode::CREATED, Json(token)))
}

async fn get_token_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    // 404 only on absence; a cached zero price is a value, not a miss
    let point = state
        .price
        .get_price(&symbol)
        .ok_or_else(|| ApiError::not_found("Price not found"))?;

    Ok(Json(json!({
        "symbol": point.symbol,
        "price": point.price_usd,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalculateSwapRequest {
    token_in: String,
    token_out: String,
    /// Arrives as a string from the client; parsed and validated here
    amount_in: String,
}

async fn calculate_swap(
    State(state): State<AppState>,
    Json(req): Json<CalculateSwapRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let amount_in: f64 = req
        .amount_in
        .trim()
        .parse()
        .map_err(|_| PriceFeedError::InvalidAmount(req.amount_in.clone()))?;

    let quote = state
        .price
        .calculate_swap(&req.token_in, &req.token_out, amount_in)?;
    Ok(Json(quote))
}

async fn list_pools(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.pools.list())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePoolRequest {
    token_a: String,
    token_b: String,
    fee: f64,
    liquidity: f64,
    #[serde(default)]
    price_range: Option<PriceRange>,
}

async fn create_pool(
    State(state): State<AppState>,
    Json(req): Json<CreatePoolRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.pools.insert(NewPool {
        token_a: req.token_a,
        token_b: req.token_b,
        fee: req.fee,
        liquidity: req.liquidity,
        price_range: req.price_range,
    })?;
    Ok((StatusCode::CREATED, Json(pool)))
}

async fn get_pool_stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.pools.stats(id)?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    use dex_core::PricePoint;
    use dex_price_feed::{PriceFeedConfig, PriceService};
    use dex_store::{PoolStore, TokenStore};

    use crate::directory::StoreDirectory;

    fn test_state() -> AppState {
        let tokens = Arc::new(TokenStore::with_defaults());
        let pools = Arc::new(PoolStore::new(Arc::clone(&tokens)));
        let price = Arc::new(PriceService::new(
            PriceFeedConfig::default(),
            vec![],
            Arc::new(StoreDirectory::new(Arc::clone(&tokens))),
        ));
        price.cache().insert(PricePoint::new("ETH", 3000.0));
        price.cache().insert(PricePoint::new("USDC", 1.0));

        AppState { price, tokens, pools }
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = create_router(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_tokens() {
        let request = Request::builder()
            .uri("/api/tokens")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_get_price() {
        let request = Request::builder()
            .uri("/api/tokens/price/ETH")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "ETH");
        assert_eq!(body["price"], 3000.0);
    }

    #[tokio::test]
    async fn test_get_price_unknown_symbol() {
        let request = Request::builder()
            .uri("/api/tokens/price/PEPE")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Price not found");
    }

    #[tokio::test]
    async fn test_calculate_swap() {
        let request = post_json(
            "/api/tokens/calculate-swap",
            serde_json::json!({"tokenIn": "USDC", "tokenOut": "ETH", "amountIn": "2"}),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amountOut"], "6000.000000");
        assert_eq!(body["priceImpact"], "0.00");
        assert_eq!(body["priceRatio"], "3000.000000");
    }

    #[tokio::test]
    async fn test_calculate_swap_negative_amount() {
        let request = post_json(
            "/api/tokens/calculate-swap",
            serde_json::json!({"tokenIn": "ETH", "tokenOut": "USDC", "amountIn": "-1"}),
        );
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_calculate_swap_non_numeric_amount() {
        let request = post_json(
            "/api/tokens/calculate-swap",
            serde_json::json!({"tokenIn": "ETH", "tokenOut": "USDC", "amountIn": "lots"}),
        );
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_calculate_swap_unpriced_symbol() {
        let request = post_json(
            "/api/tokens/calculate-swap",
            serde_json::json!({"tokenIn": "ETH", "tokenOut": "DAI", "amountIn": "1"}),
        );
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_token() {
        let request = post_json(
            "/api/tokens",
            serde_json::json!({
                "symbol": "ARB",
                "name": "Arbitrum",
                "address": "0x912CE59144191C1204E64559FE8253a0e49E6548",
                "decimals": 18,
                "logoURI": "https://example.com/arb.png"
            }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["symbol"], "ARB");
        assert_eq!(body["priceUSD"], 0.0);
    }

    #[tokio::test]
    async fn test_create_duplicate_token() {
        let request = post_json(
            "/api/tokens",
            serde_json::json!({
                "symbol": "ETH",
                "name": "Ether",
                "address": "0x0000000000000000000000000000000000000001",
                "decimals": 18,
                "logoURI": "https://example.com/eth.png"
            }),
        );
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_pool_and_stats() {
        let state = test_state();
        let app = create_router(state);

        let request = post_json(
            "/api/pools",
            serde_json::json!({
                "tokenA": "ETH",
                "tokenB": "USDC",
                "fee": 0.003,
                "liquidity": 1000000.0,
                "priceRange": {"min": 2000.0, "max": 4000.0}
            }),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let pool: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let id = pool["id"].as_str().unwrap();

        let request = Request::builder()
            .uri(format!("/api/pools/{id}/stats"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let stats: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(stats["liquidity"], 1000000.0);
        assert_eq!(stats["priceRange"]["min"], 2000.0);
    }

    #[tokio::test]
    async fn test_create_pool_unknown_token() {
        let request = post_json(
            "/api/pools",
            serde_json::json!({
                "tokenA": "ETH",
                "tokenB": "PEPE",
                "fee": 0.003,
                "liquidity": 1.0
            }),
        );
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pool_stats_not_found() {
        let request = Request::builder()
            .uri(format!("/api/pools/{}/stats", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
