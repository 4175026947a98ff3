//! Exposure time series and snapshot breakdowns.
//!
//! The exposure reporter charts summed weight, active weight, and the
//! pass-through risk-contribution metrics per sector, country, and cap
//! bucket through time, plus `as_of` snapshot pies.

use arden_data::classify::CapBucket;
use arden_data::series::{self, GroupedSeries};
use arden_data::{schema, transform};
use chrono::NaiveDate;
use polars::prelude::*;

use crate::PerfError;
use crate::attribution::{ACTIVE_EXPOSURE, EXPOSURE, Grouping};
use serde::Serialize;

/// One group's snapshot exposure on the `as_of` date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureRow {
    /// Group label.
    pub group: String,

    /// Summed weight.
    pub exposure: f64,

    /// Summed active weight.
    pub active_exposure: f64,
}

/// Derive the exposure working frame from the loaded holdings table:
/// equities only, with cap buckets.
pub fn exposure_frame(df: &DataFrame) -> Result<DataFrame, PerfError> {
    Ok(transform::with_cap_buckets(transform::equities_only(df.clone().lazy())).collect()?)
}

/// Sum `value_col` per (`refdate`, group) and densify for charting.
///
/// Cap-bucket groups come back smallest first; other dimensions
/// alphabetically.
pub fn exposure_history(
    frame: &DataFrame,
    grouping: Grouping,
    value_col: &str,
) -> Result<GroupedSeries, PerfError> {
    let mut history = series::grouped_time_series(frame, grouping.column(), value_col)?;
    if grouping == Grouping::CapBucket {
        let order = CapBucket::all().map(|bucket| bucket.label());
        history.order_groups(&order);
    }
    Ok(history)
}

/// Per-group exposure and active exposure on the `as_of` date.
pub fn snapshot_exposures(
    frame: &DataFrame,
    grouping: Grouping,
    as_of: NaiveDate,
) -> Result<Vec<ExposureRow>, PerfError> {
    let group_col = grouping.column();
    let snapshot = transform::as_of_rows(frame.clone().lazy(), as_of)
        .group_by([col(group_col)])
        .agg([
            col(schema::WEIGHT).sum().alias(EXPOSURE),
            col(schema::ACTIVE_WEIGHT).sum().alias(ACTIVE_EXPOSURE),
        ])
        .sort([group_col], SortMultipleOptions::default())
        .collect()?;
    if snapshot.height() == 0 {
        return Err(PerfError::NoObservations { as_of });
    }

    let groups = series::opt_str_values(&snapshot, group_col)?;
    let exposures = series::f64_values(&snapshot, EXPOSURE)?;
    let actives = series::f64_values(&snapshot, ACTIVE_EXPOSURE)?;

    let mut rows: Vec<ExposureRow> = Vec::new();
    for index in 0..snapshot.height() {
        let Some(group) = groups[index].clone() else {
            continue;
        };
        rows.push(ExposureRow {
            group,
            exposure: exposures[index],
            active_exposure: actives[index],
        });
    }
    if grouping == Grouping::CapBucket {
        rows.sort_by_key(|row| {
            CapBucket::all()
                .iter()
                .position(|bucket| bucket.label() == row.group)
                .unwrap_or(CapBucket::all().len())
        });
    }
    Ok(rows)
}
