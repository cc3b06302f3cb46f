//! Trade execution records

use crate::ids::{EventId, TradeId, UserId};
use crate::numeric::{Cash, Quantity, Tick};
use crate::side::Side;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An executed match between a buyer and the resting counterparty.
///
/// Immutable once created; appended to the trade log and never revised.
/// `price` is the effective tick paid per unit of `side`; the resting
/// counterparty contributed the complementary tick of the same pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub trade_id: TradeId,
    pub event_id: EventId,
    pub side: Side,
    pub price: Tick,
    pub quantity: Quantity,
    pub buyer: UserId,
    pub seller: UserId,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Create a new trade record with a fresh time-sortable id
    pub fn new(
        event_id: EventId,
        side: Side,
        price: Tick,
        quantity: Quantity,
        buyer: UserId,
        seller: UserId,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            trade_id: TradeId::new(),
            event_id,
            side,
            price,
            quantity,
            buyer,
            seller,
            executed_at,
        }
    }

    /// Cash value of the buyer's leg (quantity × price, in subunits)
    pub fn cash_value(&self) -> Cash {
        self.price.cost(self.quantity)
    }
}
