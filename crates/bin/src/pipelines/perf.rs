//! Performance attribution pipeline.

use super::RunContext;
use arden_output::{LineChart, ReportBuilder, Sheet, Workbook, render_table};
use arden_perf::attribution::{self, Grouping, Window};
use arden_perf::returns;
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use serde_json::json;
use std::error::Error;

pub(crate) fn run(
    df: &DataFrame,
    context: &RunContext,
    ytd_start: NaiveDate,
) -> Result<(), Box<dyn Error>> {
    println!("\n=== Performance Attribution ===");

    let frame = attribution::attribution_frame(df)?;

    let series = returns::compounded_series(&frame)?;
    let mut chart = LineChart::new(
        "Compounded Gross Performance",
        "Compounded Return",
        series.dates.clone(),
    )
    .with_percent_axis();
    chart.push_series("Portfolio", series.compounded.clone());
    chart.save(&context.exporter.output_dir().join("compounded_return.svg"))?;
    println!(
        "Compounded gross return over {} days: {:.2}%",
        series.dates.len(),
        series.total_return() * 100.0
    );

    let windows = [
        Window::InceptionToDate,
        Window::YearToDate { start: ytd_start },
    ];
    let mut sheets: Vec<Sheet> = Vec::new();
    for window in windows {
        for grouping in Grouping::all() {
            let table = attribution::contribution_table(&frame, grouping, window, context.as_of)?;
            let header = table.header().to_vec();
            let rows: Vec<Vec<String>> = table
                .formatted_rows()
                .iter()
                .map(|row| row.to_vec())
                .collect();
            print!("\n{}", render_table(&table.title(), &header, &rows));
            sheets.push(Sheet {
                name: table.sheet_name(),
                header,
                rows,
            });
        }
    }

    let workbook = Workbook {
        name: "performance_attribution".to_string(),
        sheets,
    };
    let workbook_dir = context.exporter.write_workbook(&workbook)?;

    let report = ReportBuilder::new()
        .pipeline("perf")
        .as_of(context.as_of)
        .contents(json!({
            "total_return": series.total_return(),
            "ytd_start": ytd_start,
            "workbook": workbook_dir,
            "chart": "compounded_return.svg",
        }))
        .build()?;
    report.save(&context.exporter.output_dir().join("perf_run.json"))?;
    Ok(())
}
