//! Daily ESG score aggregation.
//!
//! Weighted scores multiply the date-normalized weight by the raw [0, 10]
//! sub-scores. The sub-scores are magnitudes, not weights; leaving them
//! unnormalized keeps the daily aggregate on the score scale so it can be
//! classified with the same rating thresholds as a single security.

use arden_data::classify::RatingCategory;
use arden_data::series::{self, GroupedSeries};
use arden_data::{schema, transform};
use chrono::NaiveDate;
use polars::prelude::*;

use crate::EsgError;

/// Daily total of the normalized-weighted overall score.
pub const WEIGHTED_OVERALL: &str = "Normalized Weighted Overall ESG Score";

/// Daily total of the normalized-weighted environmental score.
pub const WEIGHTED_ENVIRONMENTAL: &str = "Normalized Weighted ESG Environmental Score";

/// Daily total of the normalized-weighted social score.
pub const WEIGHTED_SOCIAL: &str = "Normalized Weighted ESG Social Score";

/// Daily total of the normalized-weighted governance score.
pub const WEIGHTED_GOVERNANCE: &str = "Normalized Weighted ESG Governance Score";

/// Working column for per-row rating categories.
const CATEGORY: &str = "ESG Category";

/// Daily totals of the four normalized-weighted ESG scores.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyScores {
    /// Ascending date axis.
    pub dates: Vec<NaiveDate>,

    /// Weighted overall score per date.
    pub overall: Vec<f64>,

    /// Weighted environmental score per date.
    pub environmental: Vec<f64>,

    /// Weighted social score per date.
    pub social: Vec<f64>,

    /// Weighted governance score per date.
    pub governance: Vec<f64>,
}

/// Portfolio-level weighted ESG score on a single date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioScore {
    /// Snapshot date.
    pub as_of: NaiveDate,

    /// Sum of normalized-weighted overall scores on `as_of`.
    pub score: f64,

    /// Rating bucket of the summed score.
    pub category: RatingCategory,
}

/// Normalized weight held in one rating category on a single date.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryWeight {
    /// Rating category.
    pub category: RatingCategory,

    /// Summed normalized weight of the category's securities.
    pub weight: f64,
}

fn weighted_score_exprs() -> [Expr; 4] {
    [
        (col(schema::NORMALIZED_WEIGHT) * col(schema::ESG_OVERALL)).alias(WEIGHTED_OVERALL),
        (col(schema::NORMALIZED_WEIGHT) * col(schema::ESG_ENVIRONMENTAL))
            .alias(WEIGHTED_ENVIRONMENTAL),
        (col(schema::NORMALIZED_WEIGHT) * col(schema::ESG_SOCIAL)).alias(WEIGHTED_SOCIAL),
        (col(schema::NORMALIZED_WEIGHT) * col(schema::ESG_GOVERNANCE)).alias(WEIGHTED_GOVERNANCE),
    ]
}

/// Sum the normalized-weighted overall and pillar scores per date.
pub fn daily_weighted_scores(df: &DataFrame) -> Result<DailyScores, EsgError> {
    let totals = transform::with_normalized_weights(df.clone().lazy())
        .with_columns(weighted_score_exprs())
        .group_by([col(schema::REFDATE)])
        .agg([
            col(WEIGHTED_OVERALL).sum(),
            col(WEIGHTED_ENVIRONMENTAL).sum(),
            col(WEIGHTED_SOCIAL).sum(),
            col(WEIGHTED_GOVERNANCE).sum(),
        ])
        .sort([schema::REFDATE], SortMultipleOptions::default())
        .collect()?;

    Ok(DailyScores {
        dates: series::date_values(&totals, schema::REFDATE)?,
        overall: series::f64_values(&totals, WEIGHTED_OVERALL)?,
        environmental: series::f64_values(&totals, WEIGHTED_ENVIRONMENTAL)?,
        social: series::f64_values(&totals, WEIGHTED_SOCIAL)?,
        governance: series::f64_values(&totals, WEIGHTED_GOVERNANCE)?,
    })
}

/// Normalized weight held in each rating category through time, for one
/// score column.
///
/// The result is densified onto the full date axis with zero fill, ordered
/// AAA first, so it can be charted directly.
pub fn category_weight_history(
    df: &DataFrame,
    score_col: &str,
) -> Result<GroupedSeries, EsgError> {
    let grouped = transform::with_normalized_weights(df.clone().lazy())
        .with_column(transform::rating_expr(score_col).alias(CATEGORY))
        .group_by([col(schema::REFDATE), col(CATEGORY)])
        .agg([col(schema::NORMALIZED_WEIGHT).sum()])
        .collect()?;

    let mut history =
        series::grouped_time_series(&grouped, CATEGORY, schema::NORMALIZED_WEIGHT)?;
    let order = RatingCategory::all().map(|category| category.label());
    history.order_groups(&order);
    Ok(history)
}

/// Normalized weight held in each rating category on the `as_of` date,
/// best category first.
pub fn category_breakdown_as_of(
    df: &DataFrame,
    as_of: NaiveDate,
) -> Result<Vec<CategoryWeight>, EsgError> {
    let grouped =
        transform::as_of_rows(transform::with_normalized_weights(df.clone().lazy()), as_of)
            .with_column(transform::rating_expr(schema::ESG_OVERALL).alias(CATEGORY))
            .group_by([col(CATEGORY)])
            .agg([col(schema::NORMALIZED_WEIGHT).sum()])
            .collect()?;
    if grouped.height() == 0 {
        return Err(EsgError::NoObservations { as_of });
    }

    let labels = series::str_values(&grouped, CATEGORY)?;
    let weights = series::f64_values(&grouped, schema::NORMALIZED_WEIGHT)?;
    let mut breakdown = labels
        .iter()
        .zip(&weights)
        .map(|(label, weight)| {
            let category =
                RatingCategory::from_label(label).ok_or_else(|| EsgError::UnknownCategory {
                    label: label.clone(),
                })?;
            Ok(CategoryWeight {
                category,
                weight: *weight,
            })
        })
        .collect::<Result<Vec<_>, EsgError>>()?;
    breakdown.sort_by_key(|entry| std::cmp::Reverse(entry.category));
    Ok(breakdown)
}

/// Portfolio-level weighted overall score on the `as_of` date, classified
/// with the same thresholds as a single security's score.
pub fn portfolio_score_as_of(
    df: &DataFrame,
    as_of: NaiveDate,
) -> Result<PortfolioScore, EsgError> {
    let rows =
        transform::as_of_rows(transform::with_normalized_weights(df.clone().lazy()), as_of)
            .with_column(
                (col(schema::NORMALIZED_WEIGHT) * col(schema::ESG_OVERALL))
                    .alias(WEIGHTED_OVERALL),
            )
            .select([col(WEIGHTED_OVERALL)])
            .collect()?;
    if rows.height() == 0 {
        return Err(EsgError::NoObservations { as_of });
    }

    let score: f64 = rows
        .column(WEIGHTED_OVERALL)?
        .f64()?
        .into_iter()
        .flatten()
        .sum();
    Ok(PortfolioScore {
        as_of,
        score,
        category: RatingCategory::from_score(score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arden_data::loader::{LoadOptions, prepare};

    fn sample_frame() -> DataFrame {
        let raw = df!(
            schema::REFDATE => [
                "2023-01-02", "2023-01-02", "2023-01-03", "2023-01-03",
            ],
            schema::ASSET_NAME => ["Acme Corp", "Globex", "Acme Corp", "Globex"],
            schema::COUNTRY => ["US", "GB", "US", "GB"],
            schema::WEIGHT => [0.6, 0.2, 0.5, 0.5],
            schema::ESG_OVERALL => [8.0, 4.0, 8.0, 4.0],
            schema::ESG_ENVIRONMENTAL => [6.0, 2.0, 6.0, 2.0],
            schema::ESG_SOCIAL => [7.0, 3.0, 7.0, 3.0],
            schema::ESG_GOVERNANCE => [9.0, 5.0, 9.0, 5.0],
        )
        .unwrap();
        let options = LoadOptions {
            date_format: "%Y-%m-%d".to_string(),
            ..Default::default()
        };
        prepare(raw, &options).unwrap()
    }

    #[test]
    fn test_daily_weighted_scores() {
        let scores = daily_weighted_scores(&sample_frame()).unwrap();
        assert_eq!(scores.dates.len(), 2);

        // 2023-01-02: weights normalize to 0.75 / 0.25.
        assert!((scores.overall[0] - (0.75 * 8.0 + 0.25 * 4.0)).abs() < 1e-12);
        assert!((scores.environmental[0] - (0.75 * 6.0 + 0.25 * 2.0)).abs() < 1e-12);

        // 2023-01-03: equal weights.
        assert!((scores.overall[1] - 6.0).abs() < 1e-12);
        assert!((scores.governance[1] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_category_weight_history_orders_and_zero_fills() {
        let history = category_weight_history(&sample_frame(), schema::ESG_OVERALL).unwrap();
        assert_eq!(history.dates.len(), 2);

        // 8.0 -> AA, 4.0 -> BB; AA listed before BB.
        assert_eq!(history.groups.len(), 2);
        assert_eq!(history.groups[0].0, "AA");
        assert_eq!(history.groups[1].0, "BB");
        assert!((history.groups[0].1[0] - 0.75).abs() < 1e-12);
        assert!((history.groups[0].1[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_category_breakdown_as_of() {
        let as_of = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
        let breakdown = category_breakdown_as_of(&sample_frame(), as_of).unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, RatingCategory::Aa);
        assert!((breakdown[0].weight - 0.5).abs() < 1e-12);
        assert_eq!(breakdown[1].category, RatingCategory::Bb);
    }

    #[test]
    fn test_portfolio_score_classifies_with_security_thresholds() {
        let as_of = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let score = portfolio_score_as_of(&sample_frame(), as_of).unwrap();
        assert!((score.score - 7.0).abs() < 1e-12);
        assert_eq!(score.category, RatingCategory::A);
    }

    #[test]
    fn test_empty_snapshot_is_an_error() {
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let err = portfolio_score_as_of(&sample_frame(), as_of).unwrap_err();
        assert!(matches!(err, EsgError::NoObservations { .. }));
    }
}
