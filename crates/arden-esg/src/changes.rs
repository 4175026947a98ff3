//! ESG rating-change detection.
//!
//! A security is identified by (`Asset Name`, `Country`) so distinct
//! listings of the same name never interleave. Observations are compared to
//! the immediately preceding one per security; only upgrades and downgrades
//! make it into the change log.

use arden_data::classify::{ChangeDirection, RatingCategory};
use arden_data::series;
use arden_data::{schema, transform};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

use crate::EsgError;

/// Current rating category column.
pub const CATEGORY: &str = "Overall ESG Category";

/// Prior observation's rating category column.
pub const PREVIOUS_CATEGORY: &str = "Previous ESG Category";

/// Change outcome column.
pub const DIRECTION: &str = "Category Change";

const RANK: &str = "Category Rank";
const PREVIOUS_RANK: &str = "Previous Category Rank";

/// One upgrade or downgrade of a security's ESG rating.
///
/// Serde field names reproduce the change-log export's column headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    /// Security name.
    #[serde(rename = "Asset Name")]
    pub asset_name: String,

    /// Listing country.
    #[serde(rename = "Country")]
    pub country: String,

    /// Date the new rating was observed.
    #[serde(rename = "refdate")]
    pub refdate: NaiveDate,

    /// Rating category after the change.
    #[serde(rename = "Overall ESG Category")]
    pub rating: RatingCategory,

    /// Rating category before the change.
    #[serde(rename = "Previous ESG Category")]
    pub previous_rating: RatingCategory,

    /// Upgrade or downgrade.
    #[serde(rename = "Category Change")]
    pub direction: ChangeDirection,

    /// The security's normalized weight on the change date.
    #[serde(rename = "Normalized Weight")]
    pub normalized_weight: f64,
}

impl ChangeRecord {
    /// Console table header matching the export's column order.
    pub const fn table_header() -> [&'static str; 7] {
        [
            "Asset Name",
            "Country",
            "refdate",
            "Overall ESG Category",
            "Previous ESG Category",
            "Category Change",
            "Normalized Weight",
        ]
    }

    /// Console table row for this record.
    pub fn table_row(&self) -> [String; 7] {
        [
            self.asset_name.clone(),
            self.country.clone(),
            self.refdate.to_string(),
            self.rating.to_string(),
            self.previous_rating.to_string(),
            self.direction.to_string(),
            format!("{:.6}", self.normalized_weight),
        ]
    }
}

/// Detect every rating upgrade and downgrade in the table.
///
/// Returns the retained `Up`/`Down` rows sorted by date then security name.
/// First observations classify as `No Previous Data` and are dropped along
/// with `No Change` rows.
pub fn detect_rating_changes(df: &DataFrame) -> Result<Vec<ChangeRecord>, EsgError> {
    let identity = [col(schema::ASSET_NAME), col(schema::COUNTRY)];

    let changes = transform::with_normalized_weights(df.clone().lazy())
        .sort(
            [schema::ASSET_NAME, schema::COUNTRY, schema::REFDATE],
            SortMultipleOptions::default(),
        )
        .with_column(transform::rating_expr(schema::ESG_OVERALL).alias(CATEGORY))
        .with_column(transform::rating_rank_expr(CATEGORY).alias(RANK))
        .with_columns([
            col(CATEGORY)
                .shift(lit(1))
                .over(identity.clone())
                .alias(PREVIOUS_CATEGORY),
            col(RANK)
                .shift(lit(1))
                .over(identity)
                .alias(PREVIOUS_RANK),
        ])
        .with_column(
            when(col(PREVIOUS_RANK).is_null())
                .then(lit(ChangeDirection::NoPreviousData.label()))
                .when(col(RANK).gt(col(PREVIOUS_RANK)))
                .then(lit(ChangeDirection::Up.label()))
                .when(col(RANK).lt(col(PREVIOUS_RANK)))
                .then(lit(ChangeDirection::Down.label()))
                .otherwise(lit(ChangeDirection::NoChange.label()))
                .alias(DIRECTION),
        )
        .filter(
            col(DIRECTION)
                .eq(lit(ChangeDirection::Up.label()))
                .or(col(DIRECTION).eq(lit(ChangeDirection::Down.label()))),
        )
        .sort(
            [schema::REFDATE, schema::ASSET_NAME],
            SortMultipleOptions::default(),
        )
        .select([
            col(schema::ASSET_NAME),
            col(schema::COUNTRY),
            col(schema::REFDATE),
            col(CATEGORY),
            col(PREVIOUS_CATEGORY),
            col(DIRECTION),
            col(schema::NORMALIZED_WEIGHT),
        ])
        .collect()?;

    collect_records(&changes)
}

/// Changes dated exactly `as_of`.
pub fn changes_as_of(records: &[ChangeRecord], as_of: NaiveDate) -> Vec<ChangeRecord> {
    records
        .iter()
        .filter(|record| record.refdate == as_of)
        .cloned()
        .collect()
}

fn collect_records(changes: &DataFrame) -> Result<Vec<ChangeRecord>, EsgError> {
    let asset_names = series::str_values(changes, schema::ASSET_NAME)?;
    let countries = series::str_values(changes, schema::COUNTRY)?;
    let dates = series::date_values(changes, schema::REFDATE)?;
    let categories = series::str_values(changes, CATEGORY)?;
    let previous = series::str_values(changes, PREVIOUS_CATEGORY)?;
    let directions = series::str_values(changes, DIRECTION)?;
    let weights = series::f64_values(changes, schema::NORMALIZED_WEIGHT)?;

    let parse_category = |label: &String| {
        RatingCategory::from_label(label).ok_or_else(|| EsgError::UnknownCategory {
            label: label.clone(),
        })
    };

    (0..changes.height())
        .map(|row| {
            Ok(ChangeRecord {
                asset_name: asset_names[row].clone(),
                country: countries[row].clone(),
                refdate: dates[row],
                rating: parse_category(&categories[row])?,
                previous_rating: parse_category(&previous[row])?,
                direction: ChangeDirection::from_label(&directions[row]).ok_or_else(|| {
                    EsgError::UnknownDirection {
                        label: directions[row].clone(),
                    }
                })?,
                normalized_weight: weights[row],
            })
        })
        .collect()
}
