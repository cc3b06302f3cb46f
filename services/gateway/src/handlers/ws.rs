//! Websocket fan-out of book updates
//!
//! Clients subscribe to one or more event ids and receive every broadcast
//! for those events, in emission order, until they disconnect. One
//! forwarding task per subscription pushes frames into a per-client queue
//! so a slow event topic never blocks the others.

use std::collections::HashMap;

use axum::{
    extract::{
        State,
        ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use types::ids::EventId;

use crate::state::AppState;

/// Client request: `{"type": "subscribe", "eventId": "..."}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WsRequest {
    #[serde(rename = "type")]
    action: String,
    event_id: EventId,
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();

    // single writer: every subscription forwards into this queue
    let (out_tx, mut out_rx) = mpsc::channel::<String>(64);
    let writer = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if sink.send(Message::Text(Utf8Bytes::from(frame))).await.is_err() {
                break;
            }
        }
    });

    let mut subscriptions: HashMap<EventId, JoinHandle<()>> = HashMap::new();

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => {
                let Ok(request) = serde_json::from_str::<WsRequest>(&text) else {
                    tracing::debug!("ignoring malformed ws message");
                    continue;
                };
                match request.action.as_str() {
                    "subscribe" => {
                        if subscriptions.contains_key(&request.event_id) {
                            continue;
                        }
                        let rx = state.exchange.subscribe(request.event_id.clone());
                        let task = forward_updates(rx, out_tx.clone());
                        subscriptions.insert(request.event_id, task);
                    }
                    "unsubscribe" => {
                        if let Some(task) = subscriptions.remove(&request.event_id) {
                            task.abort();
                        }
                    }
                    _ => tracing::debug!(action = %request.action, "ignoring unknown ws action"),
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    for (_, task) in subscriptions {
        task.abort();
    }
    writer.abort();
}

/// Forward one event topic into the client's outbound queue
fn forward_updates(
    mut rx: broadcast::Receiver<serde_json::Value>,
    out: mpsc::Sender<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(book) => {
                    let frame = json!({
                        "event": "book_update",
                        "message": book,
                    });
                    if out.send(frame.to_string()).await.is_err() {
                        break;
                    }
                }
                // dropped updates are acceptable for a lagging client; the
                // next frame carries the full book anyway
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "ws subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
