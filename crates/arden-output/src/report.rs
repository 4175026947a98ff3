//! JSON run summaries.
//!
//! Each pipeline run writes a small machine-readable report: what ran, when,
//! against which snapshot date, and the headline figures and artifact paths
//! it produced.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required builder field was never set.
    #[error("missing report field: {0}")]
    MissingField(&'static str),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Pipeline that produced the report.
    pub pipeline: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Snapshot date the run used.
    pub as_of: NaiveDate,

    /// Headline figures and artifact paths (JSON format).
    pub contents: serde_json::Value,
}

impl Report {
    /// Create a new report.
    pub fn new(pipeline: String, as_of: NaiveDate, contents: serde_json::Value) -> Self {
        Self {
            pipeline,
            timestamp: Utc::now(),
            as_of,
            contents,
        }
    }

    /// Convert report to a pretty JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report to `path` as JSON.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    pipeline: Option<String>,
    as_of: Option<NaiveDate>,
    contents: Option<serde_json::Value>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pipeline name.
    pub fn pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }

    /// Set the snapshot date.
    pub const fn as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// Set the report contents.
    pub fn contents(mut self, contents: serde_json::Value) -> Self {
        self.contents = Some(contents);
        self
    }

    /// Build the report; every field must have been set.
    pub fn build(self) -> Result<Report, ReportError> {
        Ok(Report::new(
            self.pipeline.ok_or(ReportError::MissingField("pipeline"))?,
            self.as_of.ok_or(ReportError::MissingField("as_of"))?,
            self.contents.ok_or(ReportError::MissingField("contents"))?,
        ))
    }
}
