//! Per-reveal credit cost.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Upper bound on a single reveal's price, to keep bulk totals sane.
pub const MAX_CREDIT_COST: u32 = 10_000;

/// Credits charged for one reveal. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CreditCost(u32);

impl CreditCost {
    pub fn new(credits: u32) -> Result<Self, ValidationError> {
        if credits == 0 || credits > MAX_CREDIT_COST {
            return Err(ValidationError::out_of_range(
                "credit_cost",
                1,
                i64::from(MAX_CREDIT_COST),
                i64::from(credits),
            ));
        }
        Ok(Self(credits))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Cost of `count` reveals at this price, `None` on overflow.
    pub fn times(&self, count: usize) -> Option<u64> {
        u64::try_from(count)
            .ok()
            .and_then(|n| n.checked_mul(u64::from(self.0)))
    }
}

impl Default for CreditCost {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u32> for CreditCost {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CreditCost> for u32 {
    fn from(cost: CreditCost) -> Self {
        cost.0
    }
}

impl fmt::Display for CreditCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_cost_is_rejected() {
        assert!(CreditCost::new(0).is_err());
    }

    #[test]
    fn cost_above_ceiling_is_rejected() {
        assert!(CreditCost::new(MAX_CREDIT_COST + 1).is_err());
        assert!(CreditCost::new(MAX_CREDIT_COST).is_ok());
    }

    #[test]
    fn times_multiplies() {
        let cost = CreditCost::new(2).unwrap();
        assert_eq!(cost.times(3), Some(6));
        assert_eq!(cost.times(0), Some(0));
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<CreditCost>("0").is_err());
        assert_eq!(serde_json::from_str::<CreditCost>("3").unwrap().get(), 3);
    }
}
