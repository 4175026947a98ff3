#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/ardenlabs/arden/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export main types from sub-crates
pub use arden_data as data;
pub use arden_esg as esg;
pub use arden_output as output;
pub use arden_perf as perf;

// Re-export common classification types
pub use arden_data::classify::{CapBucket, ChangeDirection, RatingCategory};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
