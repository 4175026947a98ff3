//! Per-security returns and portfolio contribution.
//!
//! Securities are keyed by (`Asset Name`, `Country`) so separate listings of
//! the same name form separate series. Both the return and the open
//! exposure look back one observation within the security's own date-ordered
//! series; each first observation stays null.

use arden_data::{schema, series};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

use crate::PerfError;

/// Add `Daily Return`, `Open Exposure`, and `Contribution` columns.
pub fn with_contributions(lf: LazyFrame) -> LazyFrame {
    let identity = [col(schema::ASSET_NAME), col(schema::COUNTRY)];
    lf.sort(
        [schema::ASSET_NAME, schema::COUNTRY, schema::REFDATE],
        SortMultipleOptions::default(),
    )
    .with_column(
        (col(schema::PRICE) / col(schema::PRICE).shift(lit(1)).over(identity.clone())
            - lit(1.0))
        .alias(schema::DAILY_RETURN),
    )
    .with_column(
        col(schema::WEIGHT)
            .shift(lit(1))
            .over(identity)
            .alias(schema::OPEN_EXPOSURE),
    )
    .with_column(
        (col(schema::DAILY_RETURN) * col(schema::OPEN_EXPOSURE)).alias(schema::CONTRIBUTION),
    )
}

/// Cross-sectional contribution sum per date, ascending.
///
/// Null contributions (first observations) are skipped by the sum, so the
/// first date in the series totals zero.
pub fn daily_portfolio_contribution(df: &DataFrame) -> Result<DataFrame, PerfError> {
    Ok(with_contributions(df.clone().lazy())
        .group_by([col(schema::REFDATE)])
        .agg([col(schema::CONTRIBUTION).sum()])
        .sort([schema::REFDATE], SortMultipleOptions::default())
        .collect()?)
}

/// A compounded portfolio return series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundedSeries {
    /// Ascending date axis.
    pub dates: Vec<NaiveDate>,

    /// Daily portfolio contribution per date.
    pub contributions: Vec<f64>,

    /// Compounded return through each date.
    pub compounded: Vec<f64>,
}

impl CompoundedSeries {
    /// Compounded return over the whole series.
    pub fn total_return(&self) -> f64 {
        self.compounded.last().copied().unwrap_or(0.0)
    }
}

/// Geometrically link daily contributions.
///
/// The running product of `(1 + c)` minus one, accumulated strictly in the
/// order given; callers pass ascending-date series.
///
/// # Examples
///
/// ```
/// let linked = arden_perf::compound(&[0.01, -0.02, 0.015]);
/// assert!((linked[2] - (1.01_f64 * 0.98 * 1.015 - 1.0)).abs() < 1e-12);
/// ```
pub fn compound(contributions: &[f64]) -> Vec<f64> {
    let mut growth = 1.0;
    contributions
        .iter()
        .map(|contribution| {
            growth *= 1.0 + contribution;
            growth - 1.0
        })
        .collect()
}

/// Compute the compounded portfolio return series for a holdings table.
pub fn compounded_series(df: &DataFrame) -> Result<CompoundedSeries, PerfError> {
    let daily = daily_portfolio_contribution(df)?;
    let dates = series::date_values(&daily, schema::REFDATE)?;
    let contributions: Vec<f64> = series::opt_f64_values(&daily, schema::CONTRIBUTION)?
        .into_iter()
        .map(|value| value.unwrap_or(0.0))
        .collect();
    let compounded = compound(&contributions);
    Ok(CompoundedSeries {
        dates,
        contributions,
        compounded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arden_data::loader::{LoadOptions, prepare};

    fn sample_frame() -> DataFrame {
        let raw = df!(
            schema::REFDATE => [
                "2023-01-02", "2023-01-02",
                "2023-01-03", "2023-01-03",
                "2023-01-04", "2023-01-04",
            ],
            schema::ASSET_NAME => [
                "Acme Corp", "Globex",
                "Acme Corp", "Globex",
                "Acme Corp", "Globex",
            ],
            schema::COUNTRY => ["US", "GB", "US", "GB", "US", "GB"],
            schema::PRICE => [10.0, 20.0, 11.0, 19.0, 11.0, 19.0],
            schema::WEIGHT => [0.5, 0.5, 0.5, 0.5, 0.5, 0.5],
        )
        .unwrap();
        let options = LoadOptions {
            date_format: "%Y-%m-%d".to_string(),
            ..Default::default()
        };
        prepare(raw, &options).unwrap()
    }

    #[test]
    fn test_first_observation_has_no_return() {
        let df = with_contributions(sample_frame().lazy()).collect().unwrap();
        let returns = series::opt_f64_values(&df, schema::DAILY_RETURN).unwrap();
        let exposures = series::opt_f64_values(&df, schema::OPEN_EXPOSURE).unwrap();

        // Sorted by asset, country, date: rows 0..3 are Acme US.
        assert_eq!(returns[0], None);
        assert_eq!(exposures[0], None);
        assert!((returns[1].unwrap() - 0.1).abs() < 1e-12);
        assert!((exposures[1].unwrap() - 0.5).abs() < 1e-12);
        assert!((returns[2].unwrap() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_contribution_is_return_times_open_exposure() {
        let df = with_contributions(sample_frame().lazy()).collect().unwrap();
        let contributions = series::opt_f64_values(&df, schema::CONTRIBUTION).unwrap();

        assert_eq!(contributions[0], None);
        assert!((contributions[1].unwrap() - 0.05).abs() < 1e-12);
        // Globex: -5% on half the book.
        assert!((contributions[4].unwrap() - (-0.025)).abs() < 1e-12);
    }

    #[test]
    fn test_daily_portfolio_contribution_skips_nulls() {
        let s = compounded_series(&sample_frame()).unwrap();
        assert_eq!(s.dates.len(), 3);
        assert!((s.contributions[0] - 0.0).abs() < 1e-12);
        assert!((s.contributions[1] - 0.025).abs() < 1e-12);
        assert!((s.contributions[2] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_compound_matches_worked_example() {
        let linked = compound(&[0.01, -0.02, 0.015]);
        let expected = 1.01_f64 * 0.98 * 1.015 - 1.0;
        assert!((linked[2] - expected).abs() < 1e-12);
        assert!((expected - (-0.004_897)).abs() < 1e-6);
    }

    #[test]
    fn test_compounding_decomposition_is_consistent() {
        // Linking dailies reproduces direct compounding of the equivalent
        // single-period return.
        let dailies = [0.01, -0.02, 0.015, 0.003];
        let linked = compound(&dailies);
        let single = dailies.iter().fold(1.0, |acc, c| acc * (1.0 + c)) - 1.0;
        let relinked = compound(&[single]);
        assert!((linked.last().unwrap() - relinked[0]).abs() < 1e-12);
    }

    #[test]
    fn test_compounded_series_accumulates_in_date_order() {
        let s = compounded_series(&sample_frame()).unwrap();
        assert!((s.compounded[0] - 0.0).abs() < 1e-12);
        assert!((s.compounded[1] - 0.025).abs() < 1e-12);
        assert!((s.total_return() - 0.025).abs() < 1e-12);
    }
}
