//! CSV and JSON export.
//!
//! Everything lands beneath one output directory: serde record files, raw
//! SVG text, and workbooks rendered as one CSV per sheet inside a named
//! subdirectory.

use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// One named sheet of string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Sheet name; becomes the CSV file stem.
    pub name: String,

    /// Column headers.
    pub header: Vec<String>,

    /// Data rows.
    pub rows: Vec<Vec<String>>,
}

/// A set of sheets exported together under one name.
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    /// Workbook name; becomes the subdirectory name.
    pub name: String,

    /// Sheets in export order.
    pub sheets: Vec<Sheet>,
}

/// Writes analysis artifacts beneath one output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    /// Create an exporter rooted at `output_dir`, creating the directory if
    /// needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Directory artifacts are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write serde records as `<name>.<extension>`.
    ///
    /// CSV headers come from the records' (renamed) field names.
    pub fn write_records<T: Serialize>(
        &self,
        name: &str,
        records: &[T],
        format: ExportFormat,
    ) -> Result<PathBuf, ExportError> {
        let path = self
            .output_dir
            .join(format!("{}.{}", name, format.extension()));
        match format {
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_path(&path)?;
                for record in records {
                    writer.serialize(record)?;
                }
                writer.flush()?;
            }
            ExportFormat::Json => {
                let file = File::create(&path)?;
                serde_json::to_writer(file, records)?;
            }
            ExportFormat::PrettyJson => {
                let file = File::create(&path)?;
                serde_json::to_writer_pretty(file, records)?;
            }
        }
        Ok(path)
    }

    /// Write raw text (rendered SVG, reports) as `file_name`.
    pub fn write_text(&self, file_name: &str, contents: &str) -> Result<PathBuf, ExportError> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Write a workbook as a directory holding one CSV per sheet.
    pub fn write_workbook(&self, workbook: &Workbook) -> Result<PathBuf, ExportError> {
        let dir = self.output_dir.join(&workbook.name);
        fs::create_dir_all(&dir)?;
        for sheet in &workbook.sheets {
            let path = dir.join(format!("{}.csv", sheet.name));
            let mut writer = csv::Writer::from_path(path)?;
            writer.write_record(&sheet.header)?;
            for row in &sheet.rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Record {
        #[serde(rename = "Asset Name")]
        asset_name: String,
        #[serde(rename = "Normalized Weight")]
        weight: f64,
    }

    fn temp_exporter(tag: &str) -> Exporter {
        let dir = std::env::temp_dir().join(format!("arden_export_{}_{}", tag, std::process::id()));
        Exporter::new(dir).unwrap()
    }

    #[test]
    fn test_csv_records_carry_renamed_headers() {
        let exporter = temp_exporter("records");
        let records = vec![Record {
            asset_name: "Acme Corp".to_string(),
            weight: 0.4,
        }];
        let path = exporter
            .write_records("changes", &records, ExportFormat::Csv)
            .unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_dir_all(exporter.output_dir()).unwrap();

        assert!(contents.starts_with("Asset Name,Normalized Weight"));
        assert!(contents.contains("Acme Corp,0.4"));
    }

    #[test]
    fn test_json_records() {
        let exporter = temp_exporter("json");
        let records = vec![Record {
            asset_name: "Acme Corp".to_string(),
            weight: 0.4,
        }];
        let path = exporter
            .write_records("changes", &records, ExportFormat::PrettyJson)
            .unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_dir_all(exporter.output_dir()).unwrap();

        assert!(contents.contains("\"Asset Name\": \"Acme Corp\""));
    }

    #[test]
    fn test_workbook_writes_one_csv_per_sheet() {
        let exporter = temp_exporter("workbook");
        let workbook = Workbook {
            name: "performance_attribution".to_string(),
            sheets: vec![
                Sheet {
                    name: "ITD_GICS_Sector".to_string(),
                    header: vec!["GICS Sector".to_string(), "Contribution".to_string()],
                    rows: vec![vec!["Industrials".to_string(), "5.00%".to_string()]],
                },
                Sheet {
                    name: "YTD_GICS_Sector".to_string(),
                    header: vec!["GICS Sector".to_string(), "Contribution".to_string()],
                    rows: vec![],
                },
            ],
        };
        let dir = exporter.write_workbook(&workbook).unwrap();

        let itd = fs::read_to_string(dir.join("ITD_GICS_Sector.csv")).unwrap();
        assert!(itd.contains("Industrials,5.00%"));
        assert!(dir.join("YTD_GICS_Sector.csv").exists());
        fs::remove_dir_all(exporter.output_dir()).unwrap();
    }
}
