//! ESG rating categories and the fixed score-to-letter thresholds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of the AAA band (inclusive).
pub const AAA_FLOOR: f64 = 8.571;

/// Lower bound of the AA band (inclusive).
pub const AA_FLOOR: f64 = 7.143;

/// Lower bound of the A band (inclusive).
pub const A_FLOOR: f64 = 5.714;

/// Lower bound of the BBB band (inclusive).
pub const BBB_FLOOR: f64 = 4.286;

/// Lower bound of the BB band (inclusive).
pub const BB_FLOOR: f64 = 2.857;

/// Lower bound of the B band (inclusive).
pub const B_FLOOR: f64 = 1.429;

/// Top of the score scale; the AAA band is closed at this value.
pub const SCORE_CEILING: f64 = 10.0;

/// The seven ordered ESG rating categories.
///
/// Variant order is worst to best so the derived ordering agrees with the
/// category rank used by change detection (CCC=0 … AAA=6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatingCategory {
    /// CCC
    #[serde(rename = "CCC")]
    Ccc,

    /// B
    #[serde(rename = "B")]
    B,

    /// BB
    #[serde(rename = "BB")]
    Bb,

    /// BBB
    #[serde(rename = "BBB")]
    Bbb,

    /// A
    #[serde(rename = "A")]
    A,

    /// AA
    #[serde(rename = "AA")]
    Aa,

    /// AAA
    #[serde(rename = "AAA")]
    Aaa,
}

impl RatingCategory {
    /// Returns all categories, best first.
    pub const fn all() -> [Self; 7] {
        [
            Self::Aaa,
            Self::Aa,
            Self::A,
            Self::Bbb,
            Self::Bb,
            Self::B,
            Self::Ccc,
        ]
    }

    /// Classify a score against the fixed threshold ladder.
    ///
    /// Total over the real line: values below the B floor fall through every
    /// band, and so do values above the score ceiling, classifying as CCC.
    ///
    /// # Examples
    ///
    /// ```
    /// use arden_data::classify::RatingCategory;
    ///
    /// assert_eq!(RatingCategory::from_score(8.571), RatingCategory::Aaa);
    /// assert_eq!(RatingCategory::from_score(8.5709), RatingCategory::Aa);
    /// assert_eq!(RatingCategory::from_score(-1.0), RatingCategory::Ccc);
    /// ```
    pub fn from_score(score: f64) -> Self {
        if (AAA_FLOOR..=SCORE_CEILING).contains(&score) {
            Self::Aaa
        } else if (AA_FLOOR..AAA_FLOOR).contains(&score) {
            Self::Aa
        } else if (A_FLOOR..AA_FLOOR).contains(&score) {
            Self::A
        } else if (BBB_FLOOR..A_FLOOR).contains(&score) {
            Self::Bbb
        } else if (BB_FLOOR..BBB_FLOOR).contains(&score) {
            Self::Bb
        } else if (B_FLOOR..BB_FLOOR).contains(&score) {
            Self::B
        } else {
            Self::Ccc
        }
    }

    /// Returns the category letter label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Aaa => "AAA",
            Self::Aa => "AA",
            Self::A => "A",
            Self::Bbb => "BBB",
            Self::Bb => "BB",
            Self::B => "B",
            Self::Ccc => "CCC",
        }
    }

    /// Returns the ordinal rank (CCC=0 … AAA=6).
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Ccc => 0,
            Self::B => 1,
            Self::Bb => 2,
            Self::Bbb => 3,
            Self::A => 4,
            Self::Aa => 5,
            Self::Aaa => 6,
        }
    }

    /// Parse a category from its letter label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "AAA" => Some(Self::Aaa),
            "AA" => Some(Self::Aa),
            "A" => Some(Self::A),
            "BBB" => Some(Self::Bbb),
            "BB" => Some(Self::Bb),
            "B" => Some(Self::B),
            "CCC" => Some(Self::Ccc),
            _ => None,
        }
    }
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
