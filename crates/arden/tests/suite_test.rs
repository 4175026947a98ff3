//! End-to-end test of the analytics suite through the umbrella crate.

use arden::data::loader::{LoadOptions, prepare};
use arden::data::{schema, transform};
use arden::{ChangeDirection, RatingCategory, esg, perf};
use chrono::NaiveDate;
use polars::prelude::*;

/// Three trading days, two equities, and one cash line without a sector.
fn holdings() -> DataFrame {
    let raw = df!(
        schema::REFDATE => [
            "2023-01-02", "2023-01-02", "2023-01-02",
            "2023-01-03", "2023-01-03", "2023-01-03",
            "2023-01-04", "2023-01-04", "2023-01-04",
        ],
        schema::ASSET_NAME => [
            "Acme Corp", "Globex", "USD Cash",
            "Acme Corp", "Globex", "USD Cash",
            "Acme Corp", "Globex", "USD Cash",
        ],
        schema::COUNTRY => ["US", "GB", "US", "US", "GB", "US", "US", "GB", "US"],
        schema::SECTOR => [
            Some("Industrials"), Some("Energy"), None,
            Some("Industrials"), Some("Energy"), None,
            Some("Industrials"), Some("Energy"), None,
        ],
        schema::WEIGHT => [0.5, 0.4, 0.1, 0.5, 0.4, 0.1, 0.6, 0.4, 0.0],
        schema::ACTIVE_WEIGHT => [0.1, -0.1, 0.0, 0.1, -0.1, 0.0, 0.2, -0.2, 0.0],
        schema::ESG_OVERALL => [8.0, 4.0, 0.0, 8.0, 4.0, 0.0, 8.0, 2.0, 0.0],
        schema::ESG_ENVIRONMENTAL => [7.0, 3.0, 0.0, 7.0, 3.0, 0.0, 7.0, 3.0, 0.0],
        schema::ESG_SOCIAL => [7.0, 3.0, 0.0, 7.0, 3.0, 0.0, 7.0, 3.0, 0.0],
        schema::ESG_GOVERNANCE => [9.0, 5.0, 0.0, 9.0, 5.0, 0.0, 9.0, 5.0, 0.0],
        schema::MARKET_CAP => [
            Some(1e8), Some(5e11), None,
            Some(1e8), Some(5e11), None,
            Some(1e8), Some(5e11), None,
        ],
        schema::PRICE => [10.0, 20.0, 1.0, 11.0, 19.0, 1.0, 11.0, 19.0, 1.0],
        schema::RISK_CONTRIBUTION => [0.6, 0.4, 0.0, 0.6, 0.4, 0.0, 0.7, 0.3, 0.0],
        schema::TRACKING_ERROR_CONTRIBUTION => [0.5, 0.5, 0.0, 0.5, 0.5, 0.0, 0.5, 0.5, 0.0],
    )
    .unwrap();
    let options = LoadOptions {
        date_format: "%Y-%m-%d".to_string(),
        ..Default::default()
    };
    prepare(raw, &options).unwrap()
}

#[test]
fn test_esg_aggregation_end_to_end() {
    let df = holdings();
    let as_of = transform::max_refdate(&df).unwrap();
    assert_eq!(as_of, NaiveDate::from_ymd_opt(2023, 1, 4).unwrap());

    // Weights already sum to one per day, so normalization is the identity:
    // 0.6 * 8.0 + 0.4 * 2.0 = 5.6.
    let portfolio = esg::aggregate::portfolio_score_as_of(&df, as_of).unwrap();
    assert!((portfolio.score - 5.6).abs() < 1e-12);
    assert_eq!(portfolio.category, RatingCategory::Bbb);

    let scores = esg::aggregate::daily_weighted_scores(&df).unwrap();
    assert_eq!(scores.dates.len(), 3);
    assert!((scores.overall[0] - (0.5 * 8.0 + 0.4 * 4.0)).abs() < 1e-12);
}

#[test]
fn test_change_detection_end_to_end() {
    let df = holdings();
    let records = esg::changes::detect_rating_changes(&df).unwrap();

    // Globex drops from BB to B on the final day; nothing else moves.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].asset_name, "Globex");
    assert_eq!(records[0].previous_rating, RatingCategory::Bb);
    assert_eq!(records[0].rating, RatingCategory::B);
    assert_eq!(records[0].direction, ChangeDirection::Down);

    let as_of = transform::max_refdate(&df).unwrap();
    assert_eq!(esg::changes::changes_as_of(&records, as_of).len(), 1);
}

#[test]
fn test_performance_attribution_end_to_end() {
    let df = holdings();
    let as_of = transform::max_refdate(&df).unwrap();

    let frame = perf::attribution::attribution_frame(&df).unwrap();
    let series = perf::returns::compounded_series(&frame).unwrap();

    // Day two: Acme +10% on 0.5, Globex -5% on 0.4.
    assert!((series.contributions[1] - (0.05 - 0.02)).abs() < 1e-12);
    assert!((series.total_return() - 0.03).abs() < 1e-12);

    let table = perf::attribution::contribution_table(
        &frame,
        perf::Grouping::Sector,
        perf::Window::InceptionToDate,
        as_of,
    )
    .unwrap();

    // The table's arithmetic total matches the summed daily contributions.
    let summed: f64 = series.contributions.iter().sum();
    assert!((table.total_contribution - summed).abs() < 1e-12);

    // Cash never enters the equity tables.
    assert!(table.rows.iter().all(|row| !row.group.is_empty()));
    assert_eq!(table.rows.len(), 2);

    let snapshot =
        perf::exposure::snapshot_exposures(&frame, perf::Grouping::CapBucket, as_of).unwrap();
    assert_eq!(snapshot[0].group, "Micro-cap");
    assert_eq!(snapshot[1].group, "Mega-cap");
}
