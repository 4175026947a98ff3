//! Column contract for the holdings table.
//!
//! One row per (security, date). Source columns must all be present in the
//! input file; derived columns are added in memory by the pipelines.

use crate::error::{DataError, Result};
use polars::prelude::DataFrame;

/// Calendar date of the observation.
pub const REFDATE: &str = "refdate";

/// Security name.
pub const ASSET_NAME: &str = "Asset Name";

/// Listing country. Together with [`ASSET_NAME`] it identifies a security.
pub const COUNTRY: &str = "Country";

/// GICS sector classification; empty for non-equity rows (currencies etc.).
pub const SECTOR: &str = "GICS_sector";

/// Portfolio weight as a decimal fraction.
pub const WEIGHT: &str = "Weight (%)";

/// Portfolio weight minus benchmark weight.
pub const ACTIVE_WEIGHT: &str = "Active Weight (%)";

/// Overall ESG score in [0, 10].
pub const ESG_OVERALL: &str = "Overall ESG Score";

/// Environmental pillar score in [0, 10].
pub const ESG_ENVIRONMENTAL: &str = "Overall ESG Environmental Score";

/// Social pillar score in [0, 10].
pub const ESG_SOCIAL: &str = "Overall ESG Social Score";

/// Governance pillar score in [0, 10].
pub const ESG_GOVERNANCE: &str = "Overall ESG Governance Score";

/// Market capitalization in USD.
pub const MARKET_CAP: &str = "Market Capitalization (USD)";

/// Price in USD.
pub const PRICE: &str = "Price(USD)";

/// Precomputed contribution to total risk; pass-through only.
pub const RISK_CONTRIBUTION: &str = "%Contribution to Total Risk";

/// Precomputed contribution to tracking error; pass-through only.
pub const TRACKING_ERROR_CONTRIBUTION: &str = "%Contribution to Tracking Error";

/// Columns every input file must provide.
pub const REQUIRED: &[&str] = &[
    REFDATE,
    ASSET_NAME,
    COUNTRY,
    SECTOR,
    WEIGHT,
    ACTIVE_WEIGHT,
    ESG_OVERALL,
    ESG_ENVIRONMENTAL,
    ESG_SOCIAL,
    ESG_GOVERNANCE,
    MARKET_CAP,
    PRICE,
    RISK_CONTRIBUTION,
    TRACKING_ERROR_CONTRIBUTION,
];

/// Weight rescaled so each date's cross-section sums to one. Derived.
pub const NORMALIZED_WEIGHT: &str = "Normalized Weight";

/// Market-cap size class label. Derived.
pub const CAP_BUCKET: &str = "Market Cap Bucket";

/// Price change versus the security's prior observation. Derived.
pub const DAILY_RETURN: &str = "Daily Return";

/// Prior observation's portfolio weight. Derived.
pub const OPEN_EXPOSURE: &str = "Open Exposure";

/// `Daily Return` times `Open Exposure`. Derived.
pub const CONTRIBUTION: &str = "Contribution";

/// Check that every required column is present.
///
/// A missing column fails the run immediately; no pipeline can proceed
/// without the full contract.
pub fn validate(df: &DataFrame) -> Result<()> {
    for column in REQUIRED {
        if df.column(column).is_err() {
            return Err(DataError::MissingColumn {
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_validate_rejects_missing_column() {
        let df = df!(REFDATE => ["01/02/2023"], ASSET_NAME => ["Acme Corp"]).unwrap();
        let err = validate(&df).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { column } if column == COUNTRY));
    }

    #[test]
    fn test_validate_accepts_full_contract() {
        let mut columns: Vec<Column> = Vec::new();
        for name in REQUIRED {
            columns.push(Column::new((*name).into(), ["x"]));
        }
        let df = DataFrame::new(columns).unwrap();
        assert!(validate(&df).is_ok());
    }
}
