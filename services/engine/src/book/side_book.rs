//! One side of an event's book: ordered price levels
//!
//! `BTreeMap` keyed by tick gives ascending iteration, so the cheapest
//! offer is always matched first. A level whose quantity reaches zero is
//! removed immediately and is never observable from outside.

use std::collections::BTreeMap;

use types::errors::ExchangeError;
use types::ids::UserId;
use types::numeric::{Quantity, Tick};

use super::price_level::{Fill, OrderKind, PriceLevel};

#[derive(Debug, Default)]
pub struct SideBook {
    levels: BTreeMap<Tick, PriceLevel>,
}

impl SideBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest-price non-empty level
    pub fn best_level(&self) -> Option<(Tick, &PriceLevel)> {
        self.levels.iter().next().map(|(tick, level)| (*tick, level))
    }

    pub fn level_at(&self, price: Tick) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub fn append(&mut self, price: Tick, user: UserId, quantity: Quantity, kind: OrderKind) {
        self.levels
            .entry(price)
            .or_default()
            .append(user, quantity, kind);
    }

    pub fn consume(&mut self, price: Tick, quantity: Quantity) -> Vec<Fill> {
        let Some(level) = self.levels.get_mut(&price) else {
            return Vec::new();
        };
        let fills = level.consume(quantity);
        if level.is_empty() {
            self.levels.remove(&price);
        }
        fills
    }

    pub fn cancel_plan(&self, price: Tick, user: &UserId, quantity: Quantity) -> Vec<(OrderKind, Quantity)> {
        self.levels
            .get(&price)
            .map(|level| level.cancellable(user, quantity))
            .unwrap_or_default()
    }

    pub fn cancel(
        &mut self,
        price: Tick,
        user: &UserId,
        quantity: Quantity,
    ) -> Result<Vec<(OrderKind, Quantity)>, ExchangeError> {
        let Some(level) = self.levels.get_mut(&price) else {
            return Err(ExchangeError::OrderNotFound { user: user.clone() });
        };
        let removed = level.remove_user(user, quantity);
        if removed.is_empty() {
            return Err(ExchangeError::OrderNotFound { user: user.clone() });
        }
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Ok(removed)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Levels in ascending price order
    pub fn levels(&self) -> impl Iterator<Item = (Tick, &PriceLevel)> {
        self.levels.iter().map(|(tick, level)| (*tick, level))
    }

    /// Sum of all resting quantities of one kind on this side
    pub fn total_of_kind(&self, kind: OrderKind) -> Quantity {
        self.levels
            .values()
            .flat_map(|level| level.orders())
            .filter(|order| order.kind == kind)
            .map(|order| order.quantity)
            .sum()
    }
}
