//! Raw-data explorer: project the display columns, text-search them and
//! truncate to a row count.

use polars::prelude::*;
use tracing::debug;

use crate::error::{DashError, Result};
use crate::model::SalesTable;
use crate::schema::display;

/// Rows whose displayed cells contain `term`, ignoring case.
///
/// Every displayed column is compared through its string form, and one
/// matching cell is enough. An empty term keeps every row.
pub fn search(table: &SalesTable, term: &str) -> Result<DataFrame> {
    let df = table.frame();
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return Ok(df.clone());
    }

    let mut mask = vec![false; df.height()];
    for name in display::COLUMNS {
        let text = df.column(name)?.cast(&DataType::String)?;
        for (hit, value) in mask.iter_mut().zip(text.str()?.into_iter()) {
            if !*hit {
                *hit = value.is_some_and(|v| v.to_lowercase().contains(&needle));
            }
        }
    }

    let mask = BooleanChunked::from_slice("mask".into(), &mask);
    let matched = df.filter(&mask)?;
    debug!(term, matched = matched.height(), "search applied");
    Ok(matched)
}

/// Search, keep the display columns and the first `rows` matches.
pub fn explore(table: &SalesTable, term: &str, rows: usize) -> Result<DataFrame> {
    if !display::ROW_CHOICES.contains(&rows) {
        return Err(DashError::General(format!(
            "rows must be one of {:?}, got {rows}",
            display::ROW_CHOICES
        )));
    }
    let matched = search(table, term)?;
    Ok(matched.select(display::COLUMNS)?.head(Some(rows)))
}
