//! Filter-and-aggregate core of a retail sales dashboard, plus the seeded
//! generator for its synthetic order data.
//!
//! Data flow: [`generator`] writes the order CSV once; [`SalesTable::load`]
//! reads it at startup; [`Dashboard::render`] filters it and computes the
//! views a presentation layer draws.

pub mod aggregation;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod generator;
pub mod model;
pub mod schema;
pub mod search;

#[cfg(feature = "python")]
mod python;

pub use aggregation::KpiSummary;
pub use dashboard::{Dashboard, ViewKind, ViewModel};
pub use error::{DashError, Result};
pub use filter::{FilterOptions, FilterSpec};
pub use generator::{GeneratorConfig, OrderRecord, SalesGenerator};
pub use model::{SalesTable, SelectionSummary};

/// Round to `decimals` places, halves to even after scaling.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
