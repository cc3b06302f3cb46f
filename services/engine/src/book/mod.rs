//! Order book infrastructure
//!
//! One book per event, holding a YES side and a NO side. Each side is an
//! offer book for its own contracts: explicit sells of side S rest on side
//! S, and the minted complementary leg of a buy of S rests on the opposite
//! side at the complementary tick.

pub mod price_level;
pub mod side_book;

pub use price_level::{Fill, OrderKind, PriceLevel, RestingOrder};
pub use side_book::SideBook;

use types::errors::ExchangeError;
use types::ids::UserId;
use types::numeric::{Quantity, Tick};
use types::side::Side;

/// Order book for a single event
#[derive(Debug, Default)]
pub struct OrderBook {
    yes: SideBook,
    no: SideBook,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, side: Side) -> &SideBook {
        match side {
            Side::Yes => &self.yes,
            Side::No => &self.no,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Yes => &mut self.yes,
            Side::No => &mut self.no,
        }
    }

    /// Cheapest non-empty level on a side, with its total quantity
    pub fn best_level(&self, side: Side) -> Option<(Tick, Quantity)> {
        self.side(side)
            .best_level()
            .map(|(tick, level)| (tick, level.total_quantity()))
    }

    /// Append a resting order at the back of a level's FIFO queue
    pub fn append(&mut self, side: Side, price: Tick, user: UserId, quantity: Quantity, kind: OrderKind) {
        self.side_mut(side).append(price, user, quantity, kind);
    }

    /// Consume up to `quantity` from the FIFO head(s) of a level.
    ///
    /// Returns the per-counterparty fills in FIFO order; exhausted orders
    /// and emptied levels are removed.
    pub fn consume(&mut self, side: Side, price: Tick, quantity: Quantity) -> Vec<Fill> {
        self.side_mut(side).consume(price, quantity)
    }

    /// Read-only plan of what a cancel would remove, FIFO order
    pub fn cancel_plan(
        &self,
        side: Side,
        price: Tick,
        user: &UserId,
        quantity: Quantity,
    ) -> Vec<(OrderKind, Quantity)> {
        self.side(side).cancel_plan(price, user, quantity)
    }

    /// Remove up to `quantity` of a user's resting orders at a level
    pub fn cancel(
        &mut self,
        side: Side,
        price: Tick,
        user: &UserId,
        quantity: Quantity,
    ) -> Result<Vec<(OrderKind, Quantity)>, ExchangeError> {
        self.side_mut(side).cancel(price, user, quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.yes.is_empty() && self.no.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides_are_independent() {
        let mut book = OrderBook::new();
        let tick = Tick::try_new(4).unwrap();

        book.append(Side::Yes, tick, UserId::new("a"), Quantity::new(5), OrderKind::Sell);

        assert_eq!(book.best_level(Side::Yes), Some((tick, Quantity::new(5))));
        assert_eq!(book.best_level(Side::No), None);
        assert!(!book.is_empty());
    }

    #[test]
    fn test_consume_empties_book() {
        let mut book = OrderBook::new();
        let tick = Tick::try_new(4).unwrap();

        book.append(Side::No, tick, UserId::new("a"), Quantity::new(5), OrderKind::Minted);
        let fills = book.consume(Side::No, tick, Quantity::new(5));

        assert_eq!(fills.len(), 1);
        assert!(book.is_empty());
    }
}
