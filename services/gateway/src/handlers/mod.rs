pub mod account;
pub mod market;
pub mod order;
pub mod ws;

use axum::Json;
use engine::processor::Outcome;

use crate::error::AppError;

/// Turn an engine outcome into an HTTP response: error kinds map to
/// statuses, success payloads pass through as JSON.
fn respond(outcome: Outcome) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(err) = outcome.error {
        return Err(AppError::from(err));
    }
    let payload = serde_json::from_str(&outcome.reply.msg)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("malformed reply payload: {e}")))?;
    Ok(Json(payload))
}
