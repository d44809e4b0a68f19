use serde::{Deserialize, Serialize};

use super::domain::{Rating, RatingMap};

/// Normalize a rating set to 0..=100. An empty set scores zero; otherwise
/// the sum of values over the maximum attainable (`5 * n`).
///
/// Only self ratings feed the persisted assignment score; reviewer ratings
/// are kept for side-by-side display and never blended in.
pub fn percentage(ratings: &RatingMap) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    let sum: u32 = ratings.values().map(|rating| u32::from(rating.value())).sum();
    let max = u32::from(Rating::MAX) * ratings.len() as u32;
    100.0 * f64::from(sum) / f64::from(max)
}

/// Round to one decimal place for presentation. The stored score keeps
/// full precision.
pub fn display_rounded(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

/// Informational display tier; not part of the data contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    Excellent,
    VeryGood,
    Good,
    NeedsImprovement,
}

impl PerformanceBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 80.0 {
            Self::VeryGood
        } else if score >= 70.0 {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "Excellent",
            PerformanceBand::VeryGood => "Very Good",
            PerformanceBand::Good => "Good",
            PerformanceBand::NeedsImprovement => "Needs Improvement",
        }
    }
}
