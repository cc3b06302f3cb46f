use axum::{Json, extract::State};
use engine::commands::Command;

use super::respond;
use crate::error::AppError;
use crate::models::{MintRequest, OrderRequest};
use crate::state::AppState;

pub async fn place_buy(
    State(state): State<AppState>,
    Json(payload): Json<OrderRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state
        .exchange
        .submit(Command::PlaceBuy {
            user_id: payload.user_id,
            event_id: payload.event_id,
            side: payload.side,
            price: payload.price,
            quantity: payload.quantity,
        })
        .await?;
    respond(outcome)
}

pub async fn place_sell(
    State(state): State<AppState>,
    Json(payload): Json<OrderRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state
        .exchange
        .submit(Command::PlaceSell {
            user_id: payload.user_id,
            event_id: payload.event_id,
            side: payload.side,
            price: payload.price,
            quantity: payload.quantity,
        })
        .await?;
    respond(outcome)
}

pub async fn cancel_order(
    State(state): State<AppState>,
    Json(payload): Json<OrderRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state
        .exchange
        .submit(Command::Cancel {
            user_id: payload.user_id,
            event_id: payload.event_id,
            side: payload.side,
            price: payload.price,
            quantity: payload.quantity,
        })
        .await?;
    respond(outcome)
}

pub async fn mint_pair(
    State(state): State<AppState>,
    Json(payload): Json<MintRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state
        .exchange
        .submit(Command::MintPair {
            user_id: payload.user_id,
            event_id: payload.event_id,
            quantity: payload.quantity,
        })
        .await?;
    respond(outcome)
}
