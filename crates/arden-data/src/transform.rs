//! Derived-column expression builders shared by the pipelines.
//!
//! Everything here is a pure reshaping of the in-memory table: weight
//! normalization, rating and cap-bucket classification, window filters.
//! The scalar classifiers in [`crate::classify`] and these columnar
//! expressions share the same threshold constants.

use crate::classify::{CapBucket, RatingCategory, cap, rating};
use crate::error::{DataError, Result};
use crate::schema;
use chrono::NaiveDate;
use polars::prelude::*;

/// Rescale `Weight (%)` so each date's cross-section sums to one.
///
/// A zero or missing daily sum divides through as non-finite values; the
/// degenerate case propagates rather than being repaired.
pub fn with_normalized_weights(lf: LazyFrame) -> LazyFrame {
    lf.with_column(
        (col(schema::WEIGHT) / col(schema::WEIGHT).sum().over([col(schema::REFDATE)]))
            .alias(schema::NORMALIZED_WEIGHT),
    )
}

/// Rating-category expression for one score column.
///
/// Mirrors [`RatingCategory::from_score`]: each band is checked against both
/// of its bounds, so out-of-scale scores fall through to CCC.
pub fn rating_expr(score_col: &str) -> Expr {
    let score = col(score_col);
    let band = |floor: f64, ceiling: f64| {
        score
            .clone()
            .gt_eq(lit(floor))
            .and(score.clone().lt(lit(ceiling)))
    };
    when(
        score
            .clone()
            .gt_eq(lit(rating::AAA_FLOOR))
            .and(score.clone().lt_eq(lit(rating::SCORE_CEILING))),
    )
    .then(lit(RatingCategory::Aaa.label()))
    .when(band(rating::AA_FLOOR, rating::AAA_FLOOR))
    .then(lit(RatingCategory::Aa.label()))
    .when(band(rating::A_FLOOR, rating::AA_FLOOR))
    .then(lit(RatingCategory::A.label()))
    .when(band(rating::BBB_FLOOR, rating::A_FLOOR))
    .then(lit(RatingCategory::Bbb.label()))
    .when(band(rating::BB_FLOOR, rating::BBB_FLOOR))
    .then(lit(RatingCategory::Bb.label()))
    .when(band(rating::B_FLOOR, rating::BB_FLOOR))
    .then(lit(RatingCategory::B.label()))
    .otherwise(lit(RatingCategory::Ccc.label()))
}

/// Ordinal-rank expression for a rating-category column (CCC=0 … AAA=6).
pub fn rating_rank_expr(category_col: &str) -> Expr {
    let category = col(category_col);
    let mut chain = when(category.clone().eq(lit(RatingCategory::Aaa.label())))
        .then(lit(i32::from(RatingCategory::Aaa.rank())))
        .when(category.clone().eq(lit(RatingCategory::Aa.label())))
        .then(lit(i32::from(RatingCategory::Aa.rank())));
    for rung in [
        RatingCategory::A,
        RatingCategory::Bbb,
        RatingCategory::Bb,
        RatingCategory::B,
    ] {
        chain = chain
            .when(category.clone().eq(lit(rung.label())))
            .then(lit(i32::from(rung.rank())));
    }
    chain.otherwise(lit(i32::from(RatingCategory::Ccc.rank())))
}

/// Market-cap bucket expression over `Market Capitalization (USD)`.
///
/// Rows without a capitalization stay null so they drop out of grouped
/// output, matching the scalar classifier's domain of actual values.
pub fn cap_bucket_expr() -> Expr {
    let market_cap = col(schema::MARKET_CAP);
    when(market_cap.clone().is_null())
        .then(lit(NULL))
        .when(market_cap.clone().lt_eq(lit(cap::MICRO_CEILING_USD)))
        .then(lit(CapBucket::Micro.label()))
        .when(market_cap.clone().lt_eq(lit(cap::SMALL_CEILING_USD)))
        .then(lit(CapBucket::Small.label()))
        .when(market_cap.clone().lt_eq(lit(cap::MID_CEILING_USD)))
        .then(lit(CapBucket::Mid.label()))
        .when(market_cap.lt_eq(lit(cap::LARGE_CEILING_USD)))
        .then(lit(CapBucket::Large.label()))
        .otherwise(lit(CapBucket::Mega.label()))
}

/// Add the `Market Cap Bucket` column.
pub fn with_cap_buckets(lf: LazyFrame) -> LazyFrame {
    lf.with_column(cap_bucket_expr().alias(schema::CAP_BUCKET))
}

/// Keep only equity rows (non-empty GICS sector).
///
/// Currencies and other non-equity lines carry no sector classification.
pub fn equities_only(lf: LazyFrame) -> LazyFrame {
    lf.filter(col(schema::SECTOR).is_not_null())
}

/// Rows dated exactly `as_of`.
pub fn as_of_rows(lf: LazyFrame, as_of: NaiveDate) -> LazyFrame {
    lf.filter(col(schema::REFDATE).eq(lit(as_of)))
}

/// Rows dated on or after `start`.
pub fn from_date(lf: LazyFrame, start: NaiveDate) -> LazyFrame {
    lf.filter(col(schema::REFDATE).gt_eq(lit(start)))
}

/// Latest `refdate` present in the table.
///
/// Pipelines use this as the default `as_of` so snapshot aggregations are
/// deterministic rather than re-derived ad hoc.
pub fn max_refdate(df: &DataFrame) -> Result<NaiveDate> {
    df.column(schema::REFDATE)?
        .date()?
        .as_date_iter()
        .flatten()
        .max()
        .ok_or_else(|| DataError::Empty {
            reason: "no refdate values".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadOptions, prepare};

    fn sample_frame() -> DataFrame {
        let raw = df!(
            schema::REFDATE => [
                "2023-01-02", "2023-01-02", "2023-01-03", "2023-01-03",
            ],
            schema::ASSET_NAME => ["Acme Corp", "Globex", "Acme Corp", "Globex"],
            schema::COUNTRY => ["US", "GB", "US", "GB"],
            schema::SECTOR => [Some("Industrials"), None, Some("Industrials"), None],
            schema::WEIGHT => [0.6, 0.2, 0.3, 0.3],
            schema::MARKET_CAP => [Some(250e6), Some(3e11), Some(250_000_001.0), None],
            schema::ESG_OVERALL => [8.571, 1.0, 7.0, 11.0],
        )
        .unwrap();
        let options = LoadOptions {
            date_format: "%Y-%m-%d".to_string(),
            ..Default::default()
        };
        prepare(raw, &options).unwrap()
    }

    #[test]
    fn test_normalized_weights_sum_to_one_per_date() {
        let df = with_normalized_weights(sample_frame().lazy())
            .collect()
            .unwrap();
        let dates = crate::series::date_values(&df, schema::REFDATE).unwrap();
        let weights = crate::series::f64_values(&df, schema::NORMALIZED_WEIGHT).unwrap();

        let mut daily: std::collections::BTreeMap<chrono::NaiveDate, f64> = Default::default();
        for (date, weight) in dates.iter().zip(&weights) {
            *daily.entry(*date).or_insert(0.0) += weight;
        }
        for total in daily.values() {
            assert!((total - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rating_expr_matches_scalar_classifier() {
        let df = sample_frame()
            .lazy()
            .with_column(rating_expr(schema::ESG_OVERALL).alias("category"))
            .collect()
            .unwrap();
        let scores = crate::series::f64_values(&df, schema::ESG_OVERALL).unwrap();
        let categories = crate::series::str_values(&df, "category").unwrap();
        for (score, label) in scores.iter().zip(&categories) {
            assert_eq!(RatingCategory::from_score(*score).label(), label);
        }
    }

    #[test]
    fn test_rank_expr_matches_category_ranks() {
        let df = sample_frame()
            .lazy()
            .with_column(rating_expr(schema::ESG_OVERALL).alias("category"))
            .with_column(rating_rank_expr("category").alias("rank"))
            .collect()
            .unwrap();
        let categories = crate::series::str_values(&df, "category").unwrap();
        let ranks = df.column("rank").unwrap().i32().unwrap();
        for (label, rank) in categories.iter().zip(ranks.into_iter()) {
            let expected = RatingCategory::from_label(label).unwrap().rank();
            assert_eq!(rank, Some(i32::from(expected)));
        }
    }

    #[test]
    fn test_cap_bucket_boundaries_and_null() {
        let df = with_cap_buckets(sample_frame().lazy()).collect().unwrap();
        let buckets: Vec<Option<String>> =
            crate::series::opt_str_values(&df, schema::CAP_BUCKET).unwrap();
        assert_eq!(buckets[0].as_deref(), Some("Micro-cap"));
        assert_eq!(buckets[1].as_deref(), Some("Mega-cap"));
        assert_eq!(buckets[2].as_deref(), Some("Small-cap"));
        assert_eq!(buckets[3], None);
    }

    #[test]
    fn test_equities_only_drops_unclassified_rows() {
        let df = equities_only(sample_frame().lazy()).collect().unwrap();
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_from_date_boundary_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
        let df = from_date(sample_frame().lazy(), start).collect().unwrap();
        assert_eq!(df.height(), 2);
        let dates = crate::series::date_values(&df, schema::REFDATE).unwrap();
        assert!(dates.iter().all(|date| *date >= start));
    }

    #[test]
    fn test_max_refdate() {
        let as_of = max_refdate(&sample_frame()).unwrap();
        assert_eq!(as_of, NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
    }
}
