//! Loading the holdings table.
//!
//! One consolidated load path shared by every pipeline: read the CSV,
//! validate the column contract, parse `refdate`, drop weekend rows. The
//! result is a plain [`DataFrame`]; pipelines add their derived columns on
//! top via [`crate::transform`].

use crate::error::Result;
use crate::schema;
use polars::prelude::*;
use std::path::Path;

/// Options controlling how the holdings file is read.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// strptime format of the `refdate` column.
    pub date_format: String,

    /// Drop Saturday/Sunday rows after parsing.
    pub drop_weekends: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            date_format: "%d/%m/%Y".to_string(),
            drop_weekends: true,
        }
    }
}

/// Load the holdings table from `path`.
///
/// Fails fast: a missing contract column, an unreadable file, or an
/// unparseable date aborts the run with no partial output.
pub fn load_holdings(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1024))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    schema::validate(&raw)?;
    prepare(raw, options)
}

/// Parse `refdate` and apply the trading-calendar filter to a raw table.
///
/// If the column already carries a date dtype the parse is skipped, so
/// pre-built frames can share the same path as freshly read CSV.
pub fn prepare(raw: DataFrame, options: &LoadOptions) -> Result<DataFrame> {
    let refdate = match raw.column(schema::REFDATE)?.dtype() {
        DataType::Date => col(schema::REFDATE),
        _ => col(schema::REFDATE).str().to_date(StrptimeOptions {
            format: Some(options.date_format.as_str().into()),
            ..Default::default()
        }),
    };

    let mut lf = raw.lazy().with_column(refdate);
    if options.drop_weekends {
        // polars weekday is ISO: Monday=1 .. Sunday=7
        lf = lf.filter(col(schema::REFDATE).dt().weekday().lt_eq(lit(5)));
    }
    Ok(lf.collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use std::fs;
    use std::path::PathBuf;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("arden_{}_{}.csv", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    fn full_header() -> String {
        schema::REQUIRED.join(",")
    }

    #[test]
    fn test_load_parses_dates_and_drops_weekends() {
        // 06/01/2023 is a Friday, 07/01/2023 a Saturday.
        let contents = format!(
            "{}\n\
             06/01/2023,Acme Corp,US,Industrials,0.5,0.1,7.0,6.0,7.5,8.0,1e9,10.0,0.4,0.3\n\
             07/01/2023,Acme Corp,US,Industrials,0.5,0.1,7.0,6.0,7.5,8.0,1e9,10.0,0.4,0.3\n",
            full_header()
        );
        let path = write_fixture("weekends", &contents);
        let df = load_holdings(&path, &LoadOptions::default()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(df.height(), 1);
        assert_eq!(df.column(schema::REFDATE).unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn test_load_rejects_missing_column() {
        let path = write_fixture("missing_col", "refdate,Asset Name\n06/01/2023,Acme Corp\n");
        let err = load_holdings(&path, &LoadOptions::default()).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(matches!(err, DataError::MissingColumn { .. }));
    }

    #[test]
    fn test_load_honours_date_format() {
        let contents = format!(
            "{}\n\
             2023-01-06,Acme Corp,US,Industrials,0.5,0.1,7.0,6.0,7.5,8.0,1e9,10.0,0.4,0.3\n",
            full_header()
        );
        let path = write_fixture("iso_dates", &contents);
        let options = LoadOptions {
            date_format: "%Y-%m-%d".to_string(),
            ..Default::default()
        };
        let df = load_holdings(&path, &options).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(df.height(), 1);
    }
}
