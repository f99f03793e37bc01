use serde::{Deserialize, Serialize};

use crate::error::{StateError, StateResult};

/// Inclusive range that faction influence is kept inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluenceBounds {
    /// Lowest allowed value.
    pub min: i32,
    /// Highest allowed value.
    pub max: i32,
}

impl Default for InfluenceBounds {
    fn default() -> Self {
        Self { min: 0, max: 100 }
    }
}

impl InfluenceBounds {
    /// Create bounds, rejecting `min > max`.
    pub fn new(min: i32, max: i32) -> StateResult<Self> {
        if min > max {
            return Err(StateError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// Clamp a value into the bounds.
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Whether the value lies inside the bounds.
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero_to_hundred() {
        let b = InfluenceBounds::default();
        assert_eq!(b.min, 0);
        assert_eq!(b.max, 100);
    }

    #[test]
    fn clamp_values() {
        let b = InfluenceBounds::default();
        assert_eq!(b.clamp(-5), 0);
        assert_eq!(b.clamp(42), 42);
        assert_eq!(b.clamp(250), 100);
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert_eq!(
            InfluenceBounds::new(10, -10),
            Err(StateError::InvalidBounds { min: 10, max: -10 })
        );
        assert!(InfluenceBounds::new(-10, 10).is_ok());
    }
}
