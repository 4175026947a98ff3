//! The four analysis pipelines.
//!
//! Each pipeline is a linear batch pass over the loaded holdings table:
//! derive columns, aggregate, write charts/exports, print tables, and leave
//! a JSON run summary behind.

pub(crate) mod changes;
pub(crate) mod esg;
pub(crate) mod exposure;
pub(crate) mod perf;

use arden_output::Exporter;
use chrono::NaiveDate;

/// Shared per-run context.
#[derive(Debug)]
pub(crate) struct RunContext {
    /// Snapshot date for "current" figures.
    pub as_of: NaiveDate,

    /// Artifact writer rooted at the output directory.
    pub exporter: Exporter,
}
