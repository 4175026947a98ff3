//! Windowed contribution attribution tables.
//!
//! Each table sums `Contribution` per group over a window (full history or
//! year-to-date) and joins the `as_of` exposure snapshot alongside, exactly
//! the shape the attribution workbook and console tables need.

use arden_data::classify::CapBucket;
use arden_data::{schema, series, transform};
use chrono::NaiveDate;
use polars::prelude::*;

use crate::PerfError;
use crate::returns::with_contributions;
use serde::Serialize;

/// Snapshot exposure column.
pub const EXPOSURE: &str = "Exposure";

/// Snapshot active exposure column.
pub const ACTIVE_EXPOSURE: &str = "Active Exposure";

/// Grouping dimension for attribution and exposure tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Group by GICS sector.
    Sector,

    /// Group by listing country.
    Country,

    /// Group by market-cap bucket.
    CapBucket,
}

impl Grouping {
    /// Returns all grouping dimensions.
    pub const fn all() -> [Self; 3] {
        [Self::Sector, Self::Country, Self::CapBucket]
    }

    /// Column the dimension groups on.
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Sector => schema::SECTOR,
            Self::Country => schema::COUNTRY,
            Self::CapBucket => schema::CAP_BUCKET,
        }
    }

    /// Human heading for table output.
    pub const fn heading(&self) -> &'static str {
        match self {
            Self::Sector => "GICS Sector",
            Self::Country => "Country",
            Self::CapBucket => "Market Cap Bucket",
        }
    }

    /// Workbook sheet-name suffix.
    pub const fn sheet_suffix(&self) -> &'static str {
        match self {
            Self::Sector => "GICS_Sector",
            Self::Country => "Country",
            Self::CapBucket => "Market_Cap",
        }
    }
}

/// Aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Full history.
    InceptionToDate,

    /// Dates on or after the cutoff.
    YearToDate {
        /// First date included in the window.
        start: NaiveDate,
    },
}

impl Window {
    /// Short tag used in sheet names and table titles.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::InceptionToDate => "ITD",
            Self::YearToDate { .. } => "YTD",
        }
    }
}

/// One group's attribution row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributionRow {
    /// Group label.
    pub group: String,

    /// `as_of` exposure; `None` when the group holds no position that day.
    pub exposure: Option<f64>,

    /// `as_of` active exposure.
    pub active_exposure: Option<f64>,

    /// Summed contribution over the window.
    pub contribution: f64,
}

/// Contribution attribution by one dimension over one window.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionTable {
    /// Grouping dimension.
    pub grouping: Grouping,

    /// Aggregation window.
    pub window: Window,

    /// Snapshot date of the exposure columns.
    pub as_of: NaiveDate,

    /// Per-group rows; cap buckets smallest first, otherwise alphabetical.
    pub rows: Vec<AttributionRow>,

    /// Sum of the rows' exposures.
    pub total_exposure: f64,

    /// Sum of the rows' active exposures.
    pub total_active_exposure: f64,

    /// Sum of the rows' contributions.
    pub total_contribution: f64,
}

impl AttributionTable {
    /// Workbook sheet name, e.g. `ITD_GICS_Sector`.
    pub fn sheet_name(&self) -> String {
        format!("{}_{}", self.window.tag(), self.grouping.sheet_suffix())
    }

    /// Table title, e.g. `Contributions by GICS Sector ITD`.
    pub fn title(&self) -> String {
        format!("Contributions by {} {}", self.grouping.heading(), self.window.tag())
    }

    /// Column headers in export order.
    pub fn header(&self) -> [String; 4] {
        [
            self.grouping.heading().to_string(),
            EXPOSURE.to_string(),
            ACTIVE_EXPOSURE.to_string(),
            "Contribution".to_string(),
        ]
    }

    /// Rows formatted for display (percentages to 2 decimal places), with a
    /// trailing Total row computed from the unformatted values.
    pub fn formatted_rows(&self) -> Vec<[String; 4]> {
        let mut formatted: Vec<[String; 4]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.group.clone(),
                    fmt_opt_pct(row.exposure),
                    fmt_opt_pct(row.active_exposure),
                    fmt_pct(row.contribution),
                ]
            })
            .collect();
        formatted.push([
            "Total".to_string(),
            fmt_pct(self.total_exposure),
            fmt_pct(self.total_active_exposure),
            fmt_pct(self.total_contribution),
        ]);
        formatted
    }
}

fn fmt_pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn fmt_opt_pct(value: Option<f64>) -> String {
    value.map(fmt_pct).unwrap_or_default()
}

/// Derive the attribution working frame from the loaded holdings table:
/// equities only, cap buckets, per-security contributions.
///
/// Contributions are computed over the full history before any window is
/// applied, so a YTD table's first days still carry returns earned against
/// pre-cutoff exposures.
pub fn attribution_frame(df: &DataFrame) -> Result<DataFrame, PerfError> {
    Ok(with_contributions(transform::with_cap_buckets(transform::equities_only(
        df.clone().lazy(),
    )))
    .collect()?)
}

/// Build one attribution table from a prepared frame
/// (see [`attribution_frame`]).
pub fn contribution_table(
    frame: &DataFrame,
    grouping: Grouping,
    window: Window,
    as_of: NaiveDate,
) -> Result<AttributionTable, PerfError> {
    let windowed = match window {
        Window::InceptionToDate => frame.clone().lazy(),
        Window::YearToDate { start } => transform::from_date(frame.clone().lazy(), start),
    };
    let group_col = grouping.column();

    let contributions = windowed
        .clone()
        .group_by([col(group_col)])
        .agg([col(schema::CONTRIBUTION).sum()]);

    let snapshot = transform::as_of_rows(windowed, as_of)
        .group_by([col(group_col)])
        .agg([
            col(schema::WEIGHT).sum().alias(EXPOSURE),
            col(schema::ACTIVE_WEIGHT).sum().alias(ACTIVE_EXPOSURE),
        ]);

    let joined = contributions
        .join(
            snapshot,
            [col(group_col)],
            [col(group_col)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([group_col], SortMultipleOptions::default())
        .collect()?;
    if joined.height() == 0 {
        return Err(PerfError::EmptyWindow {
            window: window.tag(),
        });
    }

    let groups = series::opt_str_values(&joined, group_col)?;
    let exposures = series::opt_f64_values(&joined, EXPOSURE)?;
    let actives = series::opt_f64_values(&joined, ACTIVE_EXPOSURE)?;
    let sums = series::opt_f64_values(&joined, schema::CONTRIBUTION)?;

    let mut rows: Vec<AttributionRow> = Vec::new();
    for index in 0..joined.height() {
        // Rows without a group label (unbucketed capitalizations) drop out,
        // the same way a grouped aggregation skips them.
        let Some(group) = groups[index].clone() else {
            continue;
        };
        rows.push(AttributionRow {
            group,
            exposure: exposures[index],
            active_exposure: actives[index],
            contribution: sums[index].unwrap_or(0.0),
        });
    }
    if grouping == Grouping::CapBucket {
        order_bucket_rows(&mut rows);
    }

    let total_exposure = rows.iter().filter_map(|row| row.exposure).sum();
    let total_active_exposure = rows.iter().filter_map(|row| row.active_exposure).sum();
    let total_contribution = rows.iter().map(|row| row.contribution).sum();

    Ok(AttributionTable {
        grouping,
        window,
        as_of,
        rows,
        total_exposure,
        total_active_exposure,
        total_contribution,
    })
}

fn order_bucket_rows(rows: &mut [AttributionRow]) {
    rows.sort_by_key(|row| {
        CapBucket::all()
            .iter()
            .position(|bucket| bucket.label() == row.group)
            .unwrap_or(CapBucket::all().len())
    });
}
