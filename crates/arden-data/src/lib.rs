#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/ardenlabs/arden/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod error;
pub mod loader;
pub mod schema;
pub mod series;
pub mod transform;

pub use classify::{CapBucket, ChangeDirection, RatingCategory};
pub use error::{DataError, Result};
pub use loader::{LoadOptions, load_holdings};
pub use series::GroupedSeries;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
