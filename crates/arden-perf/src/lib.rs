#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/ardenlabs/arden/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod attribution;
pub mod exposure;
pub mod returns;

pub use attribution::{AttributionRow, AttributionTable, Grouping, Window};
pub use exposure::ExposureRow;
pub use returns::{CompoundedSeries, compound};

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during performance and exposure aggregation.
#[derive(Debug, Error)]
pub enum PerfError {
    /// No rows dated at the requested snapshot date.
    #[error("no observations dated {as_of}")]
    NoObservations {
        /// Snapshot date that matched nothing.
        as_of: NaiveDate,
    },

    /// An aggregation window matched no rows at all.
    #[error("no observations in the {window} window")]
    EmptyWindow {
        /// Tag of the empty window (ITD/YTD).
        window: &'static str,
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
