//! Exposure reporting pipeline.

use super::RunContext;
use arden_data::schema;
use arden_output::{LineChart, PieChart, ReportBuilder};
use arden_perf::attribution::Grouping;
use arden_perf::exposure;
use polars::prelude::DataFrame;
use serde_json::json;
use std::error::Error;

const HISTORY_CHARTS: [(Grouping, &str, &str, &str); 9] = [
    (
        Grouping::Sector,
        schema::WEIGHT,
        "Exposure by Sector Over Time",
        "exposure_by_sector.svg",
    ),
    (
        Grouping::Sector,
        schema::ACTIVE_WEIGHT,
        "Active Exposure by Sector Over Time",
        "active_exposure_by_sector.svg",
    ),
    (
        Grouping::Country,
        schema::WEIGHT,
        "Exposure by Country Over Time",
        "exposure_by_country.svg",
    ),
    (
        Grouping::Country,
        schema::ACTIVE_WEIGHT,
        "Active Exposure by Country Over Time",
        "active_exposure_by_country.svg",
    ),
    (
        Grouping::Sector,
        schema::RISK_CONTRIBUTION,
        "Sector Risk Contribution",
        "risk_contribution_by_sector.svg",
    ),
    (
        Grouping::Sector,
        schema::TRACKING_ERROR_CONTRIBUTION,
        "Sector Tracking Error Contribution",
        "tracking_error_by_sector.svg",
    ),
    (
        Grouping::Country,
        schema::RISK_CONTRIBUTION,
        "Country Risk Contribution",
        "risk_contribution_by_country.svg",
    ),
    (
        Grouping::CapBucket,
        schema::WEIGHT,
        "Market Cap Exposures",
        "exposure_by_cap_bucket.svg",
    ),
    (
        Grouping::CapBucket,
        schema::RISK_CONTRIBUTION,
        "Market Cap Risk Contribution",
        "risk_contribution_by_cap_bucket.svg",
    ),
];

pub(crate) fn run(df: &DataFrame, context: &RunContext) -> Result<(), Box<dyn Error>> {
    println!("\n=== Exposure Reporting ===");

    let frame = exposure::exposure_frame(df)?;

    let mut charts: Vec<&str> = Vec::new();
    for (grouping, value_col, title, file_name) in HISTORY_CHARTS {
        let history = exposure::exposure_history(&frame, grouping, value_col)?;
        let mut chart = LineChart::new(title, format!("Sum of {}", value_col), history.dates.clone());
        for (label, values) in history.groups {
            chart.push_series(label, values);
        }
        chart.save(&context.exporter.output_dir().join(file_name))?;
        charts.push(file_name);
    }

    let snapshots = [
        (Grouping::CapBucket, "Market Cap Bucket", "cap_bucket"),
        (Grouping::Sector, "Sector", "sector"),
        (Grouping::Country, "Country", "country"),
    ];
    let mut pies: Vec<String> = Vec::new();
    for (grouping, heading, stem) in snapshots {
        let rows = exposure::snapshot_exposures(&frame, grouping, context.as_of)?;

        let mut weight_pie = PieChart::new(format!(
            "Exposure by {} as of {}",
            heading, context.as_of
        ));
        let mut active_pie = PieChart::new(format!(
            "Active Exposure by {} as of {}",
            heading, context.as_of
        ));
        for row in &rows {
            weight_pie.push_slice(row.group.clone(), row.exposure);
            active_pie.push_slice(row.group.clone(), row.active_exposure);
        }

        let weight_name = format!("snapshot_exposure_by_{}.svg", stem);
        weight_pie.save(&context.exporter.output_dir().join(&weight_name))?;
        pies.push(weight_name);

        // A fully passive book has no positive active weights to draw.
        let active_name = format!("snapshot_active_exposure_by_{}.svg", stem);
        match active_pie.save(&context.exporter.output_dir().join(&active_name)) {
            Ok(()) => pies.push(active_name),
            Err(arden_output::ChartError::Empty { reason }) => {
                eprintln!("Warning: skipping {}: {}", active_name, reason);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let report = ReportBuilder::new()
        .pipeline("exposure")
        .as_of(context.as_of)
        .contents(json!({
            "history_charts": charts,
            "snapshot_charts": pies,
        }))
        .build()?;
    report.save(&context.exporter.output_dir().join("exposure_run.json"))?;
    Ok(())
}
