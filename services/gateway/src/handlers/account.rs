use axum::{
    Json,
    extract::{Path, State},
};
use engine::commands::Command;
use types::ids::UserId;

use super::respond;
use crate::error::AppError;
use crate::models::DepositRequest;
use crate::state::AppState;

pub async fn register_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user id must be non-empty".into()));
    }
    let outcome = state
        .exchange
        .submit(Command::RegisterUser {
            user_id: UserId::new(user_id),
        })
        .await?;
    respond(outcome)
}

pub async fn deposit(
    State(state): State<AppState>,
    Json(payload): Json<DepositRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state
        .exchange
        .submit(Command::Deposit {
            user_id: payload.user_id,
            amount: payload.amount,
        })
        .await?;
    respond(outcome)
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state
        .exchange
        .submit(Command::GetBalance {
            user_id: UserId::new(user_id),
        })
        .await?;
    respond(outcome)
}

pub async fn get_positions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state
        .exchange
        .submit(Command::GetPositions {
            user_id: UserId::new(user_id),
        })
        .await?;
    respond(outcome)
}
