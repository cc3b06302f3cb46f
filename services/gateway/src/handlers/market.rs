use axum::{
    Json,
    extract::{Path, State},
};
use engine::commands::Command;
use types::ids::EventId;

use super::respond;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if event_id.trim().is_empty() {
        return Err(AppError::BadRequest("event id must be non-empty".into()));
    }
    let outcome = state
        .exchange
        .submit(Command::CreateEvent {
            event_id: EventId::new(event_id),
        })
        .await?;
    respond(outcome)
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state
        .exchange
        .submit(Command::GetBook {
            event_id: EventId::new(event_id),
        })
        .await?;
    respond(outcome)
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state.exchange.submit(Command::ResetAll {}).await?;
    respond(outcome)
}
