//! Review ratings and star rendering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest accepted review rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted review rating.
pub const MAX_RATING: u8 = 5;

/// Error returned when a rating falls outside `1..=5`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rating must be between {MIN_RATING} and {MAX_RATING} (got {0})")]
pub struct RatingError(pub i64);

/// A review rating in whole stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Get the number of stars.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|v| (MIN_RATING..=MAX_RATING).contains(v))
            .map(Self)
            .ok_or(RatingError(value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&stars(f64::from(self.0)))
    }
}

/// Render an average rating as filled stars, one per whole point.
///
/// `4.8` renders as four stars; negative and non-finite averages render empty.
#[must_use]
pub fn stars(average: f64) -> String {
    if !average.is_finite() || average < 1.0 {
        return String::new();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5 first
    let count = average.floor().min(f64::from(MAX_RATING)) as usize;
    "★".repeat(count)
}
