//! Serializable order book views
//!
//! The JSON shape published to subscribers and returned by book queries.
//! Levels appear in ascending tick order and orders within a level in FIFO
//! order, so the wire form reflects matching priority exactly.

use serde::{Deserialize, Serialize};

use types::ids::{EventId, UserId};
use types::numeric::{Quantity, Tick};

use crate::book::{OrderBook, OrderKind, SideBook};

/// One resting order as exposed to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub user: UserId,
    pub quantity: Quantity,
    pub kind: OrderKind,
}

/// One price level: total plus its FIFO queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelView {
    pub price: Tick,
    pub total: Quantity,
    pub orders: Vec<OrderEntry>,
}

/// Full view of one event's book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSnapshot {
    pub event_id: EventId,
    pub yes: Vec<LevelView>,
    pub no: Vec<LevelView>,
}

impl BookSnapshot {
    /// Capture the current state of a book
    pub fn capture(event_id: &EventId, book: &OrderBook) -> Self {
        Self {
            event_id: event_id.clone(),
            yes: side_levels(book.side(types::side::Side::Yes)),
            no: side_levels(book.side(types::side::Side::No)),
        }
    }

    /// The view of an event with no book
    pub fn empty(event_id: &EventId) -> Self {
        Self {
            event_id: event_id.clone(),
            yes: Vec::new(),
            no: Vec::new(),
        }
    }
}

fn side_levels(side: &SideBook) -> Vec<LevelView> {
    side.levels()
        .map(|(price, level)| LevelView {
            price,
            total: level.total_quantity(),
            orders: level
                .orders()
                .map(|order| OrderEntry {
                    user: order.user.clone(),
                    quantity: order.quantity,
                    kind: order.kind,
                })
                .collect(),
        })
        .collect()
}
