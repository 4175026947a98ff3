#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/ardenlabs/arden/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod export;
pub mod report;
pub mod table;

pub use chart::{ChartError, ChartSeries, LineChart, PieChart, PieSlice};
pub use export::{ExportError, ExportFormat, Exporter, Sheet, Workbook};
pub use report::{Report, ReportBuilder, ReportError};
pub use table::render_table;

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
