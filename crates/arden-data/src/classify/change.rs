//! Rating-change outcomes for consecutive observations of one security.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of comparing a security's rating rank to its prior observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeDirection {
    /// Rating rank increased.
    #[serde(rename = "Up")]
    Up,

    /// Rating rank decreased.
    #[serde(rename = "Down")]
    Down,

    /// Rating rank unchanged.
    #[serde(rename = "No Change")]
    NoChange,

    /// First observation of the security; nothing to compare against.
    #[serde(rename = "No Previous Data")]
    NoPreviousData,
}

impl ChangeDirection {
    /// Classify a rank against the prior observation's rank, if any.
    pub fn from_ranks(current: u8, previous: Option<u8>) -> Self {
        match previous {
            None => Self::NoPreviousData,
            Some(previous) if current > previous => Self::Up,
            Some(previous) if current < previous => Self::Down,
            Some(_) => Self::NoChange,
        }
    }

    /// Returns the outcome label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::NoChange => "No Change",
            Self::NoPreviousData => "No Previous Data",
        }
    }

    /// Parse an outcome from its label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Up" => Some(Self::Up),
            "Down" => Some(Self::Down),
            "No Change" => Some(Self::NoChange),
            "No Previous Data" => Some(Self::NoPreviousData),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_comparison() {
        assert_eq!(ChangeDirection::from_ranks(3, None), ChangeDirection::NoPreviousData);
        assert_eq!(ChangeDirection::from_ranks(4, Some(3)), ChangeDirection::Up);
        assert_eq!(ChangeDirection::from_ranks(2, Some(3)), ChangeDirection::Down);
        assert_eq!(ChangeDirection::from_ranks(3, Some(3)), ChangeDirection::NoChange);
    }

    #[test]
    fn test_label_round_trip() {
        for direction in [
            ChangeDirection::Up,
            ChangeDirection::Down,
            ChangeDirection::NoChange,
            ChangeDirection::NoPreviousData,
        ] {
            assert_eq!(ChangeDirection::from_label(direction.label()), Some(direction));
        }
    }
}
