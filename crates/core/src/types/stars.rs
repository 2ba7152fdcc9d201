//! Star rating value.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// A rating value between one and five stars inclusive.
///
/// ```
/// use store_ratings_core::Stars;
///
/// assert_eq!(Stars::new(4).unwrap().get(), 4);
/// assert!(Stars::new(0).is_err());
/// assert!(Stars::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Stars(u8);

impl Stars {
    /// Lowest accepted value.
    pub const MIN: u8 = 1;
    /// Highest accepted value.
    pub const MAX: u8 = 5;

    /// Validate a raw star count.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RatingOutOfRange`] unless `1 <= value <= 5`.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(ValidationError::RatingOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
            })
    }

    /// The star count.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Every valid value from highest to lowest, as shown in distributions.
    pub fn descending() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).rev().map(Self)
    }
}

impl TryFrom<i64> for Stars {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> Self {
        stars.0
    }
}

impl std::fmt::Display for Stars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        for v in 1..=5 {
            assert_eq!(i64::from(Stars::new(v).unwrap().get()), v);
        }
        assert!(Stars::new(0).is_err());
        assert!(Stars::new(6).is_err());
        assert!(Stars::new(-1).is_err());
        assert!(Stars::new(i64::from(u8::MAX) + 4).is_err());
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let stars: Stars = serde_json::from_str("3").unwrap();
        assert_eq!(stars.get(), 3);
        assert!(serde_json::from_str::<Stars>("0").is_err());
        assert!(serde_json::from_str::<Stars>("9").is_err());
    }

    #[test]
    fn test_descending() {
        let values: Vec<u8> = Stars::descending().map(Stars::get).collect();
        assert_eq!(values, vec![5, 4, 3, 2, 1]);
    }
}
