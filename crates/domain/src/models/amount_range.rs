//! Closed amount intervals used by rate tiers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed interval `[min, max]` of transaction amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl AmountRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// True when `min >= 0` and `max >= min`.
    pub fn is_well_formed(&self) -> bool {
        self.min >= Decimal::ZERO && self.max >= self.min
    }

    /// Both bounds are inclusive.
    pub fn contains(&self, amount: Decimal) -> bool {
        self.min <= amount && amount <= self.max
    }

    /// Closed-closed intersection: sharing a single endpoint counts.
    pub fn intersects(&self, other: &AmountRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

impl fmt::Display for AmountRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
