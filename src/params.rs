//! Fixed sizes of the bcrypt construction and the validated cost factor.

use std::fmt;

use crate::error::{BCryptError, Result};

pub const SALT_LEN: usize = 16;
pub const DIGEST_LEN: usize = 23;
/// Largest key the Blowfish schedule consumes, terminator included.
pub const MAX_KEY_LEN: usize = 72;
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;
/// A reasonable cost for interactive logins on current hardware.
pub const DEFAULT_COST: u32 = 12;

/// Base-2 logarithm of the number of key schedule rounds.
///
/// Only values in `MIN_COST..=MAX_COST` can be constructed, so the engine
/// never has to re-check the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cost(u32);

impl Cost {
    pub fn new(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(BCryptError::InvalidCost(cost));
        }
        Ok(Cost(cost))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of expensive key schedule iterations, `2^cost`.
    pub fn rounds(self) -> u64 {
        1u64 << self.0
    }
}

impl Default for Cost {
    fn default() -> Self {
        Cost(DEFAULT_COST)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl TryFrom<u32> for Cost {
    type Error = BCryptError;

    fn try_from(cost: u32) -> Result<Self> {
        Cost::new(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_bounds() {
        assert_eq!(Cost::new(3), Err(BCryptError::InvalidCost(3)));
        assert_eq!(Cost::new(32), Err(BCryptError::InvalidCost(32)));
        assert!(Cost::new(4).is_ok());
        assert!(Cost::new(31).is_ok());
    }

    #[test]
    fn test_rounds_and_display() -> Result<()> {
        let cost = Cost::new(5)?;
        assert_eq!(cost.rounds(), 32);
        assert_eq!(cost.to_string(), "05");
        assert_eq!(Cost::new(31)?.rounds(), 1u64 << 31);
        assert_eq!(Cost::default().to_string(), "12");
        Ok(())
    }
}
