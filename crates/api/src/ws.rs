//! WebSocket bridge onto the price subscription registry
//!
//! One connection may subscribe to any number of token pairs; every
//! subscription is tracked on the connection and released on disconnect.
//! Leaving a registry entry behind after a disconnect is a resource leak,
//! so teardown runs on every exit path out of the socket loop.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use dex_price_feed::SubscriptionHandle;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ClientMessage {
    #[serde(rename = "subscribeToPair", rename_all = "camelCase")]
    SubscribeToPair { token_in: String, token_out: String },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ServerMessage {
    #[serde(rename = "priceUpdate")]
    PriceUpdate { token: String, price: f64 },
}

pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    info!("client connected");
    let (mut sink, mut stream) = socket.split();

    // All of this connection's subscriptions feed one outbound channel
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut handles: Vec<SubscriptionHandle> = Vec::new();

    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(ClientMessage::SubscribeToPair { token_in, token_out }) => {
                            handles.push(state.price.subscribe(&token_in, tx.clone()));
                            handles.push(state.price.subscribe(&token_out, tx.clone()));
                            debug!("subscribed pair {}/{}", token_in, token_out);
                        }
                        Err(e) => {
                            debug!("unrecognized client message: {}", e);
                        }
                    }
                }
                Some(Ok(Message::Ping(payload))) => {
                    if sink.send(Message::Pong(payload)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("websocket error: {}", e);
                    break;
                }
            },
            update = rx.recv() => {
                // Senders live in `tx` and the registry, so recv can't fail
                // while this loop runs
                let Some(update) = update else { break };
                let message = ServerMessage::PriceUpdate {
                    token: update.symbol,
                    price: update.price_usd,
                };
                let payload = match serde_json::to_string(&message) {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!("failed to encode price update: {}", e);
                        continue;
                    }
                };
                if sink.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    for handle in &handles {
        state.price.unsubscribe(handle);
    }
    info!("client disconnected, {} subscriptions released", handles.len());
}
