//! Error taxonomy for the exchange core
//!
//! Every core operation returns success-or-error explicitly; nothing panics
//! across the ledger/book/matching boundary. `InvariantViolation` marks a
//! check that only a core bug can trip: fatal to the offending command,
//! never to the process.

use crate::ids::{EventId, UserId};
use crate::numeric::{Cash, Quantity};
use thiserror::Error;

/// All failure modes a command can surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Cash, available: Cash },

    #[error("insufficient position: required {required}, available {available}")]
    InsufficientPosition {
        required: Quantity,
        available: Quantity,
    },

    #[error("no resting order for user {user} at that price level")]
    OrderNotFound { user: UserId },

    #[error("event not found: {0}")]
    EventNotFound(EventId),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(u64),

    #[error("invalid price tick: {0}")]
    InvalidPrice(u8),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl ExchangeError {
    /// Whether this error indicates a core bug rather than bad user input
    pub fn is_internal(&self) -> bool {
        matches!(self, ExchangeError::InvariantViolation(_))
    }
}
