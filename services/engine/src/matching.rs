//! Core matching algorithm
//!
//! Pure functions over one ledger and one event's book. Sells are always
//! passive makers: they lock position and rest. Buys are takers: they walk
//! their side's levels cheapest-first and, if liquidity runs out, mint the
//! shortfall. The minting buyer receives the requested side outright while
//! the complementary leg rests on the opposite side at the complementary
//! tick, backed by the buyer's locked cash.
//!
//! Settlement per fill depends on how the resting order got there:
//! - `Sell`: a pure transfer. The maker's locked position moves to the
//!   buyer and the buyer's payment moves to the maker.
//! - `Minted`: pair completion. The maker's locked complementary-tick cash
//!   plus the buyer's payment total exactly one full payout per unit; both
//!   are retired as backing for the now fully-minted pair.
//!
//! Every user-facing failure is detected before the first mutation, so a
//! rejected command leaves ledger and book bit-identical.

use chrono::{DateTime, Utc};

use types::errors::ExchangeError;
use types::ids::{EventId, UserId};
use types::numeric::{pair_cost, Quantity, Tick};
use types::side::Side;
use types::trade::Trade;

use crate::book::{OrderBook, OrderKind};
use crate::ledger::Ledger;

/// Result of a buy: executed trades plus the minted remainder, if any
#[derive(Debug, Clone, PartialEq)]
pub struct BuyOutcome {
    pub trades: Vec<Trade>,
    /// Tick and quantity of the complementary leg left resting, when the
    /// book could not cover the full order
    pub minted: Option<(Tick, Quantity)>,
}

/// Rest a sell on the book, locking the seller's position.
///
/// Sells never cross the book; only a buyer can trigger settlement.
pub fn place_sell(
    ledger: &mut Ledger,
    book: &mut OrderBook,
    user: &UserId,
    event: &EventId,
    side: Side,
    price: Tick,
    quantity: Quantity,
) -> Result<(), ExchangeError> {
    if !ledger.is_registered(user) {
        return Err(ExchangeError::UserNotFound(user.clone()));
    }
    ledger.lock_position(user, event, side, quantity)?;
    book.append(side, price, user.clone(), quantity, OrderKind::Sell);
    Ok(())
}

/// Execute a buy against the book, minting any shortfall.
///
/// `price` is the maximum tick the buyer pays per unit; cheaper resting
/// offers fill first, FIFO within a level.
pub fn place_buy(
    ledger: &mut Ledger,
    book: &mut OrderBook,
    user: &UserId,
    event: &EventId,
    side: Side,
    price: Tick,
    quantity: Quantity,
    executed_at: DateTime<Utc>,
) -> Result<BuyOutcome, ExchangeError> {
    let required = price.cost(quantity);
    let account = ledger
        .account(user)
        .ok_or_else(|| ExchangeError::UserNotFound(user.clone()))?;
    if account.cash < required {
        return Err(ExchangeError::InsufficientFunds {
            required,
            available: account.cash,
        });
    }

    // Every fill costs at most `price` per unit and the minted remainder
    // locks exactly `price` per unit, so the upfront check covers the
    // worst-case spend of the whole walk.
    let mut remaining = quantity;
    let mut trades = Vec::new();

    while !remaining.is_zero() {
        let Some((tick, _)) = book.best_level(side) else {
            break;
        };
        if tick > price {
            break;
        }

        for fill in book.consume(side, tick, remaining) {
            let value = tick.cost(fill.quantity);
            match fill.kind {
                OrderKind::Sell => {
                    ledger.settle_locked_position(&fill.user, event, side, fill.quantity)?;
                    ledger.debit(user, value)?;
                    ledger.credit(&fill.user, value)?;
                }
                OrderKind::Minted => {
                    ledger.settle_locked(&fill.user, tick.complement().cost(fill.quantity))?;
                    ledger.debit(user, value)?;
                }
            }
            ledger.credit_position(user, event, side, fill.quantity)?;
            remaining -= fill.quantity;

            trades.push(Trade::new(
                event.clone(),
                side,
                tick,
                fill.quantity,
                user.clone(),
                fill.user.clone(),
                executed_at,
            ));
        }
    }

    let minted = if remaining.is_zero() {
        None
    } else {
        ledger.lock(user, price.cost(remaining))?;
        ledger.credit_position(user, event, side, remaining)?;
        book.append(
            side.opposite(),
            price.complement(),
            user.clone(),
            remaining,
            OrderKind::Minted,
        );
        Some((price.complement(), remaining))
    };

    Ok(BuyOutcome { trades, minted })
}

/// Cancel up to `quantity` of a user's resting orders at one level.
///
/// A cancelled `Sell` unlocks the seller's position. A cancelled `Minted`
/// leg unlocks the minter's cash and retires the already-credited units on
/// the opposite side: the pair was created together, so it is unwound
/// together. Returns the total quantity actually removed.
pub fn cancel(
    ledger: &mut Ledger,
    book: &mut OrderBook,
    user: &UserId,
    event: &EventId,
    side: Side,
    price: Tick,
    quantity: Quantity,
) -> Result<Quantity, ExchangeError> {
    if !ledger.is_registered(user) {
        return Err(ExchangeError::UserNotFound(user.clone()));
    }

    let plan = book.cancel_plan(side, price, user, quantity);
    if plan.is_empty() {
        return Err(ExchangeError::OrderNotFound { user: user.clone() });
    }

    // Retiring a minted leg needs the complementary units still available;
    // check before touching the book so failure mutates nothing.
    let minted_total: Quantity = plan
        .iter()
        .filter(|(kind, _)| *kind == OrderKind::Minted)
        .map(|(_, amount)| *amount)
        .sum();
    if !minted_total.is_zero() {
        let held = ledger.position(user, event, side.opposite()).available;
        if held < minted_total {
            return Err(ExchangeError::InsufficientPosition {
                required: minted_total,
                available: held,
            });
        }
    }

    let removed = book.cancel(side, price, user, quantity)?;
    let mut total = Quantity::ZERO;
    for (kind, amount) in removed {
        match kind {
            OrderKind::Sell => {
                ledger.unlock_position(user, event, side, amount)?;
            }
            OrderKind::Minted => {
                ledger.unlock(user, price.complement().cost(amount))?;
                ledger.debit_position(user, event, side.opposite(), amount)?;
            }
        }
        total += amount;
    }
    Ok(total)
}

/// Mint equal quantities of YES and NO against the user's cash.
///
/// The full payout per pair is debited outright: the cash becomes backing
/// for the redeemable pair, exactly as if a book mint had completed.
pub fn mint_pair(
    ledger: &mut Ledger,
    user: &UserId,
    event: &EventId,
    quantity: Quantity,
) -> Result<(), ExchangeError> {
    if !ledger.is_registered(user) {
        return Err(ExchangeError::UserNotFound(user.clone()));
    }
    ledger.debit(user, pair_cost(quantity))?;
    ledger.credit_position(user, event, Side::Yes, quantity)?;
    ledger.credit_position(user, event, Side::No, quantity)?;
    Ok(())
}
