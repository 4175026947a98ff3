//! ESG score aggregation pipeline.

use super::RunContext;
use arden_data::schema;
use arden_esg::aggregate;
use arden_output::{LineChart, PieChart, ReportBuilder};
use polars::prelude::DataFrame;
use serde_json::json;
use std::error::Error;

pub(crate) fn run(df: &DataFrame, context: &RunContext) -> Result<(), Box<dyn Error>> {
    println!("\n=== ESG Score Aggregation ===");

    let scores = aggregate::daily_weighted_scores(df)?;
    let mut trend = LineChart::new(
        "Normalized Weighted ESG Scores Through Time",
        "Normalized Weighted ESG Score",
        scores.dates.clone(),
    );
    trend.push_series("Overall ESG Score", scores.overall.clone());
    trend.push_series("Environmental ESG Score", scores.environmental.clone());
    trend.push_series("Social ESG Score", scores.social.clone());
    trend.push_series("Governance ESG Score", scores.governance.clone());
    trend.save(&context.exporter.output_dir().join("esg_scores_trend.svg"))?;

    let rating_charts = [
        (
            schema::ESG_OVERALL,
            "Overall ESG Scores by Rating",
            "esg_rating_history_overall.svg",
        ),
        (
            schema::ESG_ENVIRONMENTAL,
            "Environmental ESG Scores by Rating",
            "esg_rating_history_environmental.svg",
        ),
        (
            schema::ESG_SOCIAL,
            "Social ESG Scores by Rating",
            "esg_rating_history_social.svg",
        ),
        (
            schema::ESG_GOVERNANCE,
            "Governance ESG Scores by Rating",
            "esg_rating_history_governance.svg",
        ),
    ];
    for (score_col, title, file_name) in rating_charts {
        let history = aggregate::category_weight_history(df, score_col)?;
        let mut chart = LineChart::new(title, "Normalized Weight", history.dates.clone());
        for (label, values) in history.groups {
            chart.push_series(label, values);
        }
        chart.save(&context.exporter.output_dir().join(file_name))?;
    }

    let breakdown = aggregate::category_breakdown_as_of(df, context.as_of)?;
    let mut pie = PieChart::new(format!(
        "Overall ESG Category Weights as of {}",
        context.as_of
    ));
    for entry in &breakdown {
        pie.push_slice(entry.category.label(), entry.weight * 100.0);
    }
    pie.save(&context.exporter.output_dir().join("esg_rating_breakdown.svg"))?;

    let portfolio = aggregate::portfolio_score_as_of(df, context.as_of)?;
    println!(
        "Total Normalized Weighted Overall ESG Score on {}: {:.2}, Category: {}",
        portfolio.as_of, portfolio.score, portfolio.category
    );

    let report = ReportBuilder::new()
        .pipeline("esg")
        .as_of(context.as_of)
        .contents(json!({
            "portfolio_score": portfolio.score,
            "portfolio_category": portfolio.category.label(),
            "charts": [
                "esg_scores_trend.svg",
                "esg_rating_history_overall.svg",
                "esg_rating_history_environmental.svg",
                "esg_rating_history_social.svg",
                "esg_rating_history_governance.svg",
                "esg_rating_breakdown.svg",
            ],
        }))
        .build()?;
    report.save(&context.exporter.output_dir().join("esg_run.json"))?;
    Ok(())
}
