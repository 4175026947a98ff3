#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/ardenlabs/arden/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod changes;

pub use aggregate::{CategoryWeight, DailyScores, PortfolioScore};
pub use changes::ChangeRecord;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during ESG aggregation and change detection.
#[derive(Debug, Error)]
pub enum EsgError {
    /// No rows dated at the requested snapshot date.
    #[error("no observations dated {as_of}")]
    NoObservations {
        /// Snapshot date that matched nothing.
        as_of: NaiveDate,
    },

    /// A category label produced in-table failed to parse back.
    #[error("unknown rating category label: {label}")]
    UnknownCategory {
        /// The offending label.
        label: String,
    },

    /// A change-direction label produced in-table failed to parse back.
    #[error("unknown change direction label: {label}")]
    UnknownDirection {
        /// The offending label.
        label: String,
    },

    /// Data layer error.
    #[error("data error: {0}")]
    Data(#[from] arden_data::DataError),

    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
