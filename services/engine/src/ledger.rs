//! Per-user cash and contract-position ledger
//!
//! Owns every account and position in the exchange. All mutators preserve
//! the available/locked split invariants and are atomic: they either apply
//! in full or return an error having changed nothing. Reads of absent
//! entries observe zeros without creating state; only mutating operations
//! create entries.

use std::collections::BTreeMap;

use serde::Serialize;
use types::errors::ExchangeError;
use types::ids::{EventId, UserId};
use types::numeric::{Cash, Quantity};
use types::side::Side;

/// Cash balance of a single user, split into available and locked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub cash: Cash,
    pub locked_cash: Cash,
}

/// Contract holding on one side of one event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub available: Quantity,
    pub locked: Quantity,
}

/// YES and NO holdings of one user on one event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SidePair {
    pub yes: Position,
    pub no: Position,
}

impl SidePair {
    fn side(&self, side: Side) -> &Position {
        match side {
            Side::Yes => &self.yes,
            Side::No => &self.no,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Position {
        match side {
            Side::Yes => &mut self.yes,
            Side::No => &mut self.no,
        }
    }
}

/// The exchange ledger: every account and every position.
///
/// `BTreeMap` keys keep iteration (and thus every serialized view)
/// deterministic across runs.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: BTreeMap<UserId, Account>,
    holdings: BTreeMap<UserId, BTreeMap<EventId, SidePair>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with a zeroed account. Returns false if the user
    /// already existed (the existing account is left untouched).
    pub fn register(&mut self, user: UserId) -> bool {
        match self.accounts.entry(user) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(Account::default());
                true
            }
        }
    }

    pub fn is_registered(&self, user: &UserId) -> bool {
        self.accounts.contains_key(user)
    }

    /// Read a user's account, or None if never registered
    pub fn account(&self, user: &UserId) -> Option<Account> {
        self.accounts.get(user).copied()
    }

    /// Read a position; absent entries are a zero view, nothing is created
    pub fn position(&self, user: &UserId, event: &EventId, side: Side) -> Position {
        self.holdings
            .get(user)
            .and_then(|events| events.get(event))
            .map(|pair| *pair.side(side))
            .unwrap_or_default()
    }

    /// All holdings of a user across events, or None if never registered
    pub fn holdings(&self, user: &UserId) -> Option<BTreeMap<EventId, SidePair>> {
        if !self.is_registered(user) {
            return None;
        }
        Some(self.holdings.get(user).cloned().unwrap_or_default())
    }

    fn account_mut(&mut self, user: &UserId) -> Result<&mut Account, ExchangeError> {
        self.accounts
            .get_mut(user)
            .ok_or_else(|| ExchangeError::UserNotFound(user.clone()))
    }

    // --- cash operations ---

    pub fn credit(&mut self, user: &UserId, amount: Cash) -> Result<(), ExchangeError> {
        let account = self.account_mut(user)?;
        account.cash += amount;
        Ok(())
    }

    pub fn debit(&mut self, user: &UserId, amount: Cash) -> Result<(), ExchangeError> {
        let account = self.account_mut(user)?;
        account.cash = account
            .cash
            .checked_sub(amount)
            .ok_or(ExchangeError::InsufficientFunds {
                required: amount,
                available: account.cash,
            })?;
        Ok(())
    }

    /// Move cash from available to locked
    pub fn lock(&mut self, user: &UserId, amount: Cash) -> Result<(), ExchangeError> {
        let account = self.account_mut(user)?;
        account.cash = account
            .cash
            .checked_sub(amount)
            .ok_or(ExchangeError::InsufficientFunds {
                required: amount,
                available: account.cash,
            })?;
        account.locked_cash += amount;
        Ok(())
    }

    /// Return locked cash to available. Exceeding the locked amount is a
    /// caller bug, not user error.
    pub fn unlock(&mut self, user: &UserId, amount: Cash) -> Result<(), ExchangeError> {
        let account = self.account_mut(user)?;
        account.locked_cash = account.locked_cash.checked_sub(amount).ok_or_else(|| {
            ExchangeError::InvariantViolation(format!(
                "unlock of {amount} exceeds locked cash {} for {user}",
                account.locked_cash
            ))
        })?;
        account.cash += amount;
        Ok(())
    }

    /// Remove locked cash permanently (paid out or retired as pair backing)
    pub fn settle_locked(&mut self, user: &UserId, amount: Cash) -> Result<(), ExchangeError> {
        let account = self.account_mut(user)?;
        account.locked_cash = account.locked_cash.checked_sub(amount).ok_or_else(|| {
            ExchangeError::InvariantViolation(format!(
                "settlement of {amount} exceeds locked cash {} for {user}",
                account.locked_cash
            ))
        })?;
        Ok(())
    }

    // --- position operations ---

    fn position_mut(
        &mut self,
        user: &UserId,
        event: &EventId,
        side: Side,
        create: bool,
    ) -> Result<&mut Position, ExchangeError> {
        if !self.accounts.contains_key(user) {
            return Err(ExchangeError::UserNotFound(user.clone()));
        }
        if create {
            let events = self.holdings.entry(user.clone()).or_default();
            return Ok(events.entry(event.clone()).or_default().side_mut(side));
        }
        // callers pre-check quantities against the zero view, so a missing
        // entry here means the pre-check was skipped
        self.holdings
            .get_mut(user)
            .and_then(|events| events.get_mut(event))
            .map(|pair| pair.side_mut(side))
            .ok_or_else(|| {
                ExchangeError::InvariantViolation(format!(
                    "mutating absent position ({user}, {event}, {side})"
                ))
            })
    }

    pub fn credit_position(
        &mut self,
        user: &UserId,
        event: &EventId,
        side: Side,
        quantity: Quantity,
    ) -> Result<(), ExchangeError> {
        let position = self.position_mut(user, event, side, true)?;
        position.available += quantity;
        Ok(())
    }

    pub fn debit_position(
        &mut self,
        user: &UserId,
        event: &EventId,
        side: Side,
        quantity: Quantity,
    ) -> Result<(), ExchangeError> {
        let available = self.position(user, event, side).available;
        if available < quantity {
            return Err(ExchangeError::InsufficientPosition {
                required: quantity,
                available,
            });
        }
        let position = self.position_mut(user, event, side, false)?;
        position.available -= quantity;
        Ok(())
    }

    /// Move contracts from available to locked (reserved by a resting sell)
    pub fn lock_position(
        &mut self,
        user: &UserId,
        event: &EventId,
        side: Side,
        quantity: Quantity,
    ) -> Result<(), ExchangeError> {
        let available = self.position(user, event, side).available;
        if available < quantity {
            return Err(ExchangeError::InsufficientPosition {
                required: quantity,
                available,
            });
        }
        let position = self.position_mut(user, event, side, false)?;
        position.available -= quantity;
        position.locked += quantity;
        Ok(())
    }

    /// Return locked contracts to available (cancelled sell)
    pub fn unlock_position(
        &mut self,
        user: &UserId,
        event: &EventId,
        side: Side,
        quantity: Quantity,
    ) -> Result<(), ExchangeError> {
        let locked = self.position(user, event, side).locked;
        if locked < quantity {
            return Err(ExchangeError::InvariantViolation(format!(
                "position unlock of {quantity} exceeds locked {locked} for {user}"
            )));
        }
        let position = self.position_mut(user, event, side, false)?;
        position.locked -= quantity;
        position.available += quantity;
        Ok(())
    }

    /// Remove locked contracts permanently (transferred to a counterparty)
    pub fn settle_locked_position(
        &mut self,
        user: &UserId,
        event: &EventId,
        side: Side,
        quantity: Quantity,
    ) -> Result<(), ExchangeError> {
        let locked = self.position(user, event, side).locked;
        if locked < quantity {
            return Err(ExchangeError::InvariantViolation(format!(
                "position settlement of {quantity} exceeds locked {locked} for {user}"
            )));
        }
        let position = self.position_mut(user, event, side, false)?;
        position.locked -= quantity;
        Ok(())
    }

    /// Wipe every account and position
    pub fn reset(&mut self) {
        self.accounts.clear();
        self.holdings.clear();
    }

    /// Number of registered accounts
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id)
    }

    fn event(id: &str) -> EventId {
        EventId::new(id)
    }

    fn funded_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.register(user("alice"));
        ledger.credit(&user("alice"), Cash::new(10_000)).unwrap();
        ledger
    }

    #[test]
    fn test_register_is_idempotent_on_balance() {
        let mut ledger = funded_ledger();
        assert!(!ledger.register(user("alice")));
        assert_eq!(ledger.account(&user("alice")).unwrap().cash, Cash::new(10_000));
    }

    #[test]
    fn test_debit_insufficient_funds() {
        let mut ledger = funded_ledger();
        let err = ledger.debit(&user("alice"), Cash::new(10_001)).unwrap_err();
        assert!(matches!(err, ExchangeError::InsufficientFunds { .. }));
        // failed debit left the balance untouched
        assert_eq!(ledger.account(&user("alice")).unwrap().cash, Cash::new(10_000));
    }

    #[test]
    fn test_lock_unlock_roundtrip() {
        let mut ledger = funded_ledger();
        ledger.lock(&user("alice"), Cash::new(4_000)).unwrap();

        let account = ledger.account(&user("alice")).unwrap();
        assert_eq!(account.cash, Cash::new(6_000));
        assert_eq!(account.locked_cash, Cash::new(4_000));

        ledger.unlock(&user("alice"), Cash::new(4_000)).unwrap();
        let account = ledger.account(&user("alice")).unwrap();
        assert_eq!(account.cash, Cash::new(10_000));
        assert_eq!(account.locked_cash, Cash::ZERO);
    }

    #[test]
    fn test_unlock_beyond_locked_is_invariant_violation() {
        let mut ledger = funded_ledger();
        ledger.lock(&user("alice"), Cash::new(100)).unwrap();
        let err = ledger.unlock(&user("alice"), Cash::new(101)).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_settle_locked_removes_cash() {
        let mut ledger = funded_ledger();
        ledger.lock(&user("alice"), Cash::new(3_000)).unwrap();
        ledger.settle_locked(&user("alice"), Cash::new(3_000)).unwrap();

        let account = ledger.account(&user("alice")).unwrap();
        assert_eq!(account.cash, Cash::new(7_000));
        assert_eq!(account.locked_cash, Cash::ZERO);
    }

    #[test]
    fn test_unknown_user_rejected() {
        let mut ledger = Ledger::new();
        let err = ledger.credit(&user("ghost"), Cash::new(1)).unwrap_err();
        assert!(matches!(err, ExchangeError::UserNotFound(_)));
    }

    #[test]
    fn test_position_lifecycle() {
        let mut ledger = funded_ledger();
        let ev = event("rain_tomorrow");

        ledger
            .credit_position(&user("alice"), &ev, Side::Yes, Quantity::new(10))
            .unwrap();
        ledger
            .lock_position(&user("alice"), &ev, Side::Yes, Quantity::new(4))
            .unwrap();

        let position = ledger.position(&user("alice"), &ev, Side::Yes);
        assert_eq!(position.available, Quantity::new(6));
        assert_eq!(position.locked, Quantity::new(4));

        ledger
            .settle_locked_position(&user("alice"), &ev, Side::Yes, Quantity::new(4))
            .unwrap();
        let position = ledger.position(&user("alice"), &ev, Side::Yes);
        assert_eq!(position.available, Quantity::new(6));
        assert_eq!(position.locked, Quantity::ZERO);
    }

    #[test]
    fn test_lock_position_insufficient() {
        let mut ledger = funded_ledger();
        let ev = event("rain_tomorrow");
        let err = ledger
            .lock_position(&user("alice"), &ev, Side::Yes, Quantity::new(1))
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InsufficientPosition { .. }));
    }

    #[test]
    fn test_read_does_not_create_state() {
        let ledger = funded_ledger();
        let position = ledger.position(&user("alice"), &event("never_touched"), Side::No);
        assert_eq!(position, Position::default());
        assert!(ledger.holdings(&user("alice")).unwrap().is_empty());
    }

    #[test]
    fn test_reset_wipes_everything() {
        let mut ledger = funded_ledger();
        ledger
            .credit_position(&user("alice"), &event("e"), Side::No, Quantity::new(5))
            .unwrap();
        ledger.reset();
        assert_eq!(ledger.account_count(), 0);
        assert!(ledger.account(&user("alice")).is_none());
    }
}
