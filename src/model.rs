use std::collections::BTreeSet;
use std::path::Path;

use polars::prelude::StrptimeOptions;
use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{DashError, Result};
use crate::filter::{FilterOptions, FilterSpec};
use crate::generator::{self, OrderRecord};
use crate::schema::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The order table: file columns plus the date-derived columns.
///
/// Built once at startup and never mutated; filtering returns a new table.
#[derive(Debug, Clone)]
pub struct SalesTable {
    df: DataFrame,
}

/// Figures shown next to the filters: what the current selection covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSummary {
    pub orders: usize,
    pub cities: usize,
    pub products: usize,
}

impl SalesTable {
    // ── Loading ─────────────────────────────────────────────────────────────

    /// Load the order CSV. Missing file, missing required columns,
    /// unparseable dates or malformed numbers are all fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = read_csv_as_strings(path)?;
        let table = Self::prepare(raw)?;
        info!(
            path = %path.display(),
            orders = table.len(),
            "sales table loaded"
        );
        Ok(table)
    }

    /// Build a table straight from generated records, with the same typing
    /// and derived columns as [`SalesTable::load`].
    pub fn from_records(records: &[OrderRecord]) -> Result<Self> {
        Self::prepare(generator::to_frame(records)?)
    }

    /// Type the file columns and append the date-derived ones.
    fn prepare(raw: DataFrame) -> Result<Self> {
        require_columns(&raw, &order::REQUIRED)?;
        let raw_dates = raw.column(order::DATE)?.cast(&DataType::String)?;

        let mut casts: Vec<Expr> = Vec::new();
        for name in order::FLOAT_COLUMNS {
            casts.push(parse_number(name, DataType::Float64));
        }
        for name in order::INT_COLUMNS {
            casts.push(parse_number(name, DataType::Int64));
        }
        casts.push(
            col(order::DATE)
                .cast(DataType::String)
                .str()
                .strip_chars(lit(" \t\r\n"))
                .str()
                .to_date(StrptimeOptions {
                    format: Some(DATE_FORMAT.into()),
                    strict: false,
                    ..Default::default()
                }),
        );

        let df = raw
            .lazy()
            .with_columns(casts)
            .with_columns([
                col(order::DATE)
                    .dt()
                    .strftime("%Y-%m")
                    .alias(derived::MONTH_NUM),
                col(order::DATE)
                    .dt()
                    .strftime("%A")
                    .alias(derived::DAY_OF_WEEK),
                col(order::DATE)
                    .dt()
                    .week()
                    .cast(DataType::Int64)
                    .alias(derived::WEEK_NUM),
            ])
            .collect()?;
        check_dates(&df, &raw_dates)?;

        Ok(Self { df })
    }

    // ── Access ──────────────────────────────────────────────────────────────

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_frame(self) -> DataFrame {
        self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    // ── Filtering ───────────────────────────────────────────────────────────

    /// Rows whose year, category, region and channel are all selected.
    pub fn filter(&self, spec: &FilterSpec) -> Result<SalesTable> {
        let df = if spec.selects_nothing() {
            self.df.clear()
        } else {
            self.df.clone().lazy().filter(spec.predicate()).collect()?
        };
        debug!(
            source = self.df.height(),
            selected = df.height(),
            "filter applied"
        );
        Ok(SalesTable { df })
    }

    /// Sorted distinct values of every filterable dimension.
    pub fn filter_options(&self) -> Result<FilterOptions> {
        let years: BTreeSet<i32> = self
            .df
            .column(order::YEAR)?
            .as_materialized_series()
            .i64()?
            .into_iter()
            .flatten()
            .filter_map(|y| i32::try_from(y).ok())
            .collect();

        Ok(FilterOptions {
            years: years.into_iter().collect(),
            categories: self.distinct_strings(order::CATEGORY)?,
            regions: self.distinct_strings(order::REGION)?,
            channels: self.distinct_strings(order::CHANNEL)?,
        })
    }

    pub fn selection_summary(&self) -> Result<SelectionSummary> {
        Ok(SelectionSummary {
            orders: self.df.height(),
            cities: self.distinct_strings(order::CITY)?.len(),
            products: self.distinct_strings(order::PRODUCT)?.len(),
        })
    }

    fn distinct_strings(&self, column: &str) -> Result<Vec<String>> {
        let values: BTreeSet<String> = self
            .df
            .column(column)?
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        Ok(values.into_iter().collect())
    }
}

// ── Private helpers ─────────────────────────────────────────────────────────

/// Read a CSV file with all columns as String dtype, trimming column names.
fn read_csv_as_strings(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(DashError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("order file not found: {}", path.display()),
        )));
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(DashError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Strict string-to-number cast; a malformed cell fails the whole load.
fn parse_number(column: &str, dtype: DataType) -> Expr {
    col(column)
        .cast(DataType::String)
        .str()
        .strip_chars(lit(" \t\r\n"))
        .strict_cast(dtype)
}

/// Every row must carry a parseable date; report the first that does not.
fn check_dates(df: &DataFrame, raw: &Column) -> Result<()> {
    let parsed = df.column(order::DATE)?;
    if parsed.null_count() == 0 {
        return Ok(());
    }
    let Some(row) = parsed.is_null().into_iter().position(|v| v == Some(true)) else {
        return Ok(());
    };
    let text = raw.str()?.get(row);
    Err(DashError::InvalidData(match text {
        Some(text) => format!("unparseable {} '{}' at row {}", order::DATE, text, row + 1),
        None => format!("missing {} at row {}", order::DATE, row + 1),
    }))
}
