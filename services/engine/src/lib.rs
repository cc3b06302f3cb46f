//! Matching and Settlement Engine
//!
//! Order matching for binary-outcome YES/NO contracts with complementary
//! price crossing and pair minting.
//!
//! **Key Invariants:**
//! - FIFO time priority strictly enforced within a price level
//! - Effective YES + NO price of every fill totals `MAX_TICK`
//! - Failed commands leave state untouched (all-or-nothing)
//! - No empty price level is ever observable
//! - Deterministic: same command sequence → same state
//!
//! The crate is a pure synchronous state machine: no sockets, no clock
//! reads, no ambient mutable state. Timestamps and command envelopes are
//! passed in; replies and broadcasts are returned values.

pub mod book;
pub mod commands;
pub mod ledger;
pub mod matching;
pub mod processor;
pub mod snapshot;

pub use processor::CommandProcessor;
