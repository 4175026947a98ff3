//! Market-capitalization size buckets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of the Micro-cap bucket (inclusive), in USD.
pub const MICRO_CEILING_USD: f64 = 250e6;

/// Upper bound of the Small-cap bucket (inclusive), in USD.
pub const SMALL_CEILING_USD: f64 = 2e9;

/// Upper bound of the Mid-cap bucket (inclusive), in USD.
pub const MID_CEILING_USD: f64 = 10e9;

/// Upper bound of the Large-cap bucket (inclusive), in USD.
pub const LARGE_CEILING_USD: f64 = 200e9;

/// The five market-cap size classes, smallest first.
///
/// Bucket boundaries are closed on the upper side: a capitalization of
/// exactly 250 M USD is the top of Micro-cap, not the bottom of Small-cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CapBucket {
    /// Up to 250 M USD.
    #[serde(rename = "Micro-cap")]
    Micro,

    /// Up to 2 B USD.
    #[serde(rename = "Small-cap")]
    Small,

    /// Up to 10 B USD.
    #[serde(rename = "Mid-cap")]
    Mid,

    /// Up to 200 B USD.
    #[serde(rename = "Large-cap")]
    Large,

    /// Above 200 B USD.
    #[serde(rename = "Mega-cap")]
    Mega,
}

impl CapBucket {
    /// Returns all buckets, smallest first.
    pub const fn all() -> [Self; 5] {
        [Self::Micro, Self::Small, Self::Mid, Self::Large, Self::Mega]
    }

    /// Classify a market capitalization in USD.
    ///
    /// # Examples
    ///
    /// ```
    /// use arden_data::classify::CapBucket;
    ///
    /// assert_eq!(CapBucket::from_market_cap(250_000_000.0), CapBucket::Micro);
    /// assert_eq!(CapBucket::from_market_cap(250_000_001.0), CapBucket::Small);
    /// ```
    pub fn from_market_cap(usd: f64) -> Self {
        if usd <= MICRO_CEILING_USD {
            Self::Micro
        } else if usd <= SMALL_CEILING_USD {
            Self::Small
        } else if usd <= MID_CEILING_USD {
            Self::Mid
        } else if usd <= LARGE_CEILING_USD {
            Self::Large
        } else {
            Self::Mega
        }
    }

    /// Returns the bucket label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Micro => "Micro-cap",
            Self::Small => "Small-cap",
            Self::Mid => "Mid-cap",
            Self::Large => "Large-cap",
            Self::Mega => "Mega-cap",
        }
    }

    /// Upper capitalization bound in USD; `None` for the open-ended top bucket.
    pub const fn ceiling_usd(&self) -> Option<f64> {
        match self {
            Self::Micro => Some(MICRO_CEILING_USD),
            Self::Small => Some(SMALL_CEILING_USD),
            Self::Mid => Some(MID_CEILING_USD),
            Self::Large => Some(LARGE_CEILING_USD),
            Self::Mega => None,
        }
    }

    /// Parse a bucket from its label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Micro-cap" => Some(Self::Micro),
            "Small-cap" => Some(Self::Small),
            "Mid-cap" => Some(Self::Mid),
            "Large-cap" => Some(Self::Large),
            "Mega-cap" => Some(Self::Mega),
            _ => None,
        }
    }
}

impl fmt::Display for CapBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-1.0, CapBucket::Micro)]
    #[case(0.0, CapBucket::Micro)]
    #[case(250_000_000.0, CapBucket::Micro)]
    #[case(250_000_001.0, CapBucket::Small)]
    #[case(2e9, CapBucket::Small)]
    #[case(10e9, CapBucket::Mid)]
    #[case(200e9, CapBucket::Large)]
    #[case(200_000_000_001.0, CapBucket::Mega)]
    fn test_bucket_boundaries(#[case] usd: f64, #[case] expected: CapBucket) {
        assert_eq!(CapBucket::from_market_cap(usd), expected);
    }

    #[test]
    fn test_label_round_trip() {
        for bucket in CapBucket::all() {
            assert_eq!(CapBucket::from_label(bucket.label()), Some(bucket));
        }
        assert_eq!(CapBucket::from_label("Nano-cap"), None);
    }

    #[test]
    fn test_buckets_ordered_by_ceiling() {
        let all = CapBucket::all();
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(CapBucket::Mega.ceiling_usd(), None);
    }
}
