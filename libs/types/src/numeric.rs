//! Integer numeric types for prices, quantities, and cash
//!
//! All amounts are integers end-to-end: contract prices live on a fixed tick
//! scale `1..MAX_TICK`, cash lives in the smallest currency subunit, and one
//! tick is worth exactly `TICK_UNIT` subunits. Every cost computation is a
//! plain integer multiplication; there is no floating point and no runtime
//! division anywhere in the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, SubAssign};

/// Full payout of a matched YES+NO pair, in ticks.
///
/// A YES contract at tick `p` is complementary to a NO contract at tick
/// `MAX_TICK - p`; together they cost and redeem for exactly `MAX_TICK`.
pub const MAX_TICK: u8 = 10;

/// Value of one price tick in currency subunits.
pub const TICK_UNIT: u64 = 100;

/// A contract price on the fixed tick scale.
///
/// Valid order prices are `1..MAX_TICK` exclusive of both endpoints' payout
/// boundary: a price of 0 or MAX_TICK would make one side of the pair free.
/// Deserialization goes through the same range check as construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tick(u8);

impl TryFrom<u8> for Tick {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value).ok_or_else(|| format!("tick out of range: {value}"))
    }
}

impl From<Tick> for u8 {
    fn from(tick: Tick) -> u8 {
        tick.0
    }
}

impl Tick {
    /// Create a tick, returning None outside `[1, MAX_TICK - 1]`
    pub fn try_new(value: u8) -> Option<Self> {
        if (1..MAX_TICK).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Raw tick value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// The complementary tick on the opposite side: `MAX_TICK - self`.
    ///
    /// Closed over valid ticks: the complement of `[1, MAX_TICK - 1]` is
    /// itself in `[1, MAX_TICK - 1]`.
    pub fn complement(&self) -> Self {
        Self(MAX_TICK - self.0)
    }

    /// Cash cost of `quantity` units at this tick, in subunits.
    pub fn cost(&self, quantity: Quantity) -> Cash {
        Cash(quantity.0 * u64::from(self.0) * TICK_UNIT)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cash cost of minting `quantity` full YES+NO pairs, in subunits.
pub fn pair_cost(quantity: Quantity) -> Cash {
    Cash(quantity.0 * u64::from(MAX_TICK) * TICK_UNIT)
}

/// A whole-unit contract quantity.
///
/// Zero is representable (positions and levels sum quantities); order
/// quantities are validated non-zero at the command boundary.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The smaller of two quantities
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl Add for Quantity {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|q| q.0).sum())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cash amount in the smallest currency subunit.
///
/// Unsigned by construction: negative balances are unrepresentable, so the
/// no-negative-balance invariant cannot be violated silently.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cash(u64);

impl Cash {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl Add for Cash {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Cash {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Cash {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Cash {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|c| c.0).sum())
    }
}

impl fmt::Display for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
