//! ESG rating-change pipeline.

use super::RunContext;
use arden_esg::changes::{self, ChangeRecord};
use arden_output::{ExportFormat, ReportBuilder, render_table};
use polars::prelude::DataFrame;
use serde_json::json;
use std::error::Error;

pub(crate) fn run(df: &DataFrame, context: &RunContext) -> Result<(), Box<dyn Error>> {
    println!("\n=== ESG Rating Changes ===");

    let records = changes::detect_rating_changes(df)?;
    let log_path = context
        .exporter
        .write_records("rating_changes", &records, ExportFormat::Csv)?;

    let header: Vec<String> = ChangeRecord::table_header()
        .iter()
        .map(|column| column.to_string())
        .collect();
    let rows: Vec<Vec<String>> = records.iter().map(|record| record.table_row().to_vec()).collect();
    print!(
        "\n{}",
        render_table("Full Table of Category Changes", &header, &rows)
    );

    let last_day = changes::changes_as_of(&records, context.as_of);
    let last_day_path =
        context
            .exporter
            .write_records("rating_changes_last_day", &last_day, ExportFormat::Csv)?;
    let last_day_rows: Vec<Vec<String>> = last_day
        .iter()
        .map(|record| record.table_row().to_vec())
        .collect();
    print!(
        "\n{}",
        render_table(
            &format!("Rating Changes on {}", context.as_of),
            &header,
            &last_day_rows,
        )
    );

    let report = ReportBuilder::new()
        .pipeline("changes")
        .as_of(context.as_of)
        .contents(json!({
            "total_changes": records.len(),
            "changes_as_of": last_day.len(),
            "change_log": log_path,
            "last_day_log": last_day_path,
        }))
        .build()?;
    report.save(&context.exporter.output_dir().join("changes_run.json"))?;
    Ok(())
}
