//! Price level implementation with FIFO queue
//!
//! A price level contains all resting orders at a specific tick. Orders are
//! maintained in strict insertion order to enforce time priority: a buy
//! that partially clears the level consumes earlier orders completely
//! before touching later ones.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use types::ids::UserId;
use types::numeric::Quantity;

/// How a resting order came to be on the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Explicit sell command, backed by the seller's locked position
    Sell,
    /// Complementary leg of a buy that minted a new pair, backed by the
    /// minting buyer's locked cash
    Minted,
}

/// A single order resting in a level's FIFO queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestingOrder {
    pub user: UserId,
    pub quantity: Quantity,
    pub kind: OrderKind,
}

/// One counterparty's share of a consumed level, in FIFO order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    pub user: UserId,
    pub quantity: Quantity,
    pub kind: OrderKind,
}

/// A price level containing resting orders at a specific tick
///
/// Invariant: `total_quantity == Σ orders[i].quantity`, and no order in the
/// queue has zero quantity. An emptied level is removed by its side book,
/// never kept around.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    orders: VecDeque<RestingOrder>,
    total_quantity: Quantity,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order at the back of the queue (time priority)
    pub fn append(&mut self, user: UserId, quantity: Quantity, kind: OrderKind) {
        self.orders.push_back(RestingOrder {
            user,
            quantity,
            kind,
        });
        self.total_quantity += quantity;
    }

    /// Consume up to `quantity` units from the head of the queue.
    ///
    /// The head order is split if it holds more than the remainder being
    /// taken; exhausted orders are dropped. Fills come back in FIFO order,
    /// one per consumed order, and drive per-counterparty settlement.
    pub fn consume(&mut self, quantity: Quantity) -> Vec<Fill> {
        let mut fills = Vec::new();
        let mut remaining = quantity.min(self.total_quantity);

        while !remaining.is_zero() {
            let Some(head) = self.orders.front_mut() else {
                break;
            };
            let taken = head.quantity.min(remaining);
            fills.push(Fill {
                user: head.user.clone(),
                quantity: taken,
                kind: head.kind,
            });

            remaining -= taken;
            self.total_quantity -= taken;
            if head.quantity == taken {
                self.orders.pop_front();
            } else {
                head.quantity -= taken;
            }
        }

        fills
    }

    /// What `remove_user` would take, without mutating
    pub fn cancellable(&self, user: &UserId, up_to: Quantity) -> Vec<(OrderKind, Quantity)> {
        let mut plan = Vec::new();
        let mut remaining = up_to;
        for order in self.orders.iter().filter(|o| &o.user == user) {
            if remaining.is_zero() {
                break;
            }
            let taken = order.quantity.min(remaining);
            plan.push((order.kind, taken));
            remaining -= taken;
        }
        plan
    }

    /// Remove up to `up_to` units belonging to `user`, earliest first.
    ///
    /// Returns the removed amounts per order kind in FIFO order; empty if
    /// the user has nothing resting here.
    pub fn remove_user(&mut self, user: &UserId, up_to: Quantity) -> Vec<(OrderKind, Quantity)> {
        let mut removed = Vec::new();
        let mut remaining = up_to;
        for order in self.orders.iter_mut().filter(|o| &o.user == user) {
            if remaining.is_zero() {
                break;
            }
            let taken = order.quantity.min(remaining);
            removed.push((order.kind, taken));
            order.quantity -= taken;
            self.total_quantity -= taken;
            remaining -= taken;
        }
        self.orders.retain(|o| !o.quantity.is_zero());
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Resting orders in FIFO order
    pub fn orders(&self) -> impl Iterator<Item = &RestingOrder> {
        self.orders.iter()
    }
}
