//! Dense time-series extraction for charting and snapshots.
//!
//! Polars frames are the working representation; charts and console tables
//! want plain vectors on a shared date axis. The helpers here pull typed
//! columns out of a frame and densify (date × group) aggregates with zero
//! fill for absent pairs.

use crate::error::{DataError, Result};
use crate::schema;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// A (date × group) table densified onto one shared ascending date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedSeries {
    /// Shared date axis, ascending.
    pub dates: Vec<NaiveDate>,
    /// One value vector per group label, aligned to `dates`; absent pairs
    /// are filled with 0.0.
    pub groups: Vec<(String, Vec<f64>)>,
}

impl GroupedSeries {
    /// Reorder groups so labels appearing in `order` come first, in that
    /// order; unknown labels keep their alphabetical position after them.
    pub fn order_groups(&mut self, order: &[&str]) {
        self.groups.sort_by_key(|(label, _)| {
            order
                .iter()
                .position(|candidate| *candidate == label.as_str())
                .unwrap_or(order.len())
        });
    }
}

/// Sum `value_col` per (`refdate`, `group_col`) pair and densify.
///
/// Rows with a null group label are skipped; null values count as zero,
/// so partially-defined columns (first-day returns) aggregate the same way
/// a null-skipping sum would.
pub fn grouped_time_series(
    df: &DataFrame,
    group_col: &str,
    value_col: &str,
) -> Result<GroupedSeries> {
    let dates = date_values(df, schema::REFDATE)?;
    let groups = df.column(group_col)?.str()?;
    let values = df.column(value_col)?.f64()?;

    let mut axis: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut sums: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for ((date, group), value) in dates.iter().zip(groups.into_iter()).zip(values.into_iter()) {
        axis.insert(*date);
        let Some(group) = group else { continue };
        *sums
            .entry(group.to_string())
            .or_default()
            .entry(*date)
            .or_insert(0.0) += value.unwrap_or(0.0);
    }

    let dates: Vec<NaiveDate> = axis.into_iter().collect();
    let groups = sums
        .into_iter()
        .map(|(label, by_date)| {
            let series = dates
                .iter()
                .map(|date| by_date.get(date).copied().unwrap_or(0.0))
                .collect();
            (label, series)
        })
        .collect();

    Ok(GroupedSeries { dates, groups })
}

/// Per-row dates of a date column; a null is an error.
pub fn date_values(df: &DataFrame, column: &str) -> Result<Vec<NaiveDate>> {
    df.column(column)?
        .date()?
        .as_date_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| DataError::NullValue {
                column: column.to_string(),
                row,
            })
        })
        .collect()
}

/// Per-row values of a float column; nulls map to NaN.
pub fn f64_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    Ok(df
        .column(column)?
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(f64::NAN))
        .collect())
}

/// Per-row values of a float column, nulls preserved.
pub fn opt_f64_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    Ok(df.column(column)?.f64()?.into_iter().collect())
}

/// Per-row values of a string column; a null is an error.
pub fn str_values(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    df.column(column)?
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.map(str::to_string).ok_or_else(|| DataError::NullValue {
                column: column.to_string(),
                row,
            })
        })
        .collect()
}

/// Per-row values of a string column, nulls preserved.
pub fn opt_str_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    Ok(df
        .column(column)?
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}
