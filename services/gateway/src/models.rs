use serde::Deserialize;
use types::ids::{EventId, UserId};
use types::side::Side;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub user_id: UserId,
    pub amount: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: UserId,
    pub event_id: EventId,
    pub side: Side,
    pub price: u8,
    pub quantity: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    pub user_id: UserId,
    pub event_id: EventId,
    pub quantity: u64,
}
