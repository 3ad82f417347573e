use std::fmt;
use std::path::Path;

use polars::prelude::DataFrame;
use tracing::debug;

use crate::aggregation::{self, KpiSummary};
use crate::error::Result;
use crate::filter::{FilterOptions, FilterSpec};
use crate::model::{SalesTable, SelectionSummary};
use crate::search;

/// The twelve views, in the order the page shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Kpi,
    MonthlyTrend,
    CategoryBreakdown,
    Regional,
    Channel,
    TopProducts,
    YearOverYear,
    PaymentMix,
    ReturnRate,
    Rating,
    DiscountImpact,
    DayOfWeek,
}

impl ViewKind {
    pub const ALL: [ViewKind; 12] = [
        ViewKind::Kpi,
        ViewKind::MonthlyTrend,
        ViewKind::CategoryBreakdown,
        ViewKind::Regional,
        ViewKind::Channel,
        ViewKind::TopProducts,
        ViewKind::YearOverYear,
        ViewKind::PaymentMix,
        ViewKind::ReturnRate,
        ViewKind::Rating,
        ViewKind::DiscountImpact,
        ViewKind::DayOfWeek,
    ];

    /// Stable key used by bindings.
    pub fn key(self) -> &'static str {
        match self {
            ViewKind::Kpi => "kpi",
            ViewKind::MonthlyTrend => "monthly_trend",
            ViewKind::CategoryBreakdown => "category_breakdown",
            ViewKind::Regional => "regional",
            ViewKind::Channel => "channel",
            ViewKind::TopProducts => "top_products",
            ViewKind::YearOverYear => "year_over_year",
            ViewKind::PaymentMix => "payment_mix",
            ViewKind::ReturnRate => "return_rate",
            ViewKind::Rating => "rating",
            ViewKind::DiscountImpact => "discount_impact",
            ViewKind::DayOfWeek => "day_of_week",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Kpi => "Key Figures",
            ViewKind::MonthlyTrend => "Monthly Revenue Trend",
            ViewKind::CategoryBreakdown => "Revenue by Category",
            ViewKind::Regional => "Revenue by Region",
            ViewKind::Channel => "Sales by Channel",
            ViewKind::TopProducts => "Top 10 Products by Revenue",
            ViewKind::YearOverYear => "Year-over-Year Revenue",
            ViewKind::PaymentMix => "Payment Methods",
            ViewKind::ReturnRate => "Return Rate by Category",
            ViewKind::Rating => "Avg Rating by Category",
            ViewKind::DiscountImpact => "Discount vs Revenue Impact",
            ViewKind::DayOfWeek => "Orders by Day of Week",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Everything the presentation layer needs for one filter state.
#[derive(Debug, Clone)]
pub struct ViewModel {
    pub filtered: SalesTable,
    pub selection: SelectionSummary,
    pub kpis: KpiSummary,
    pub monthly_trend: DataFrame,
    pub category_breakdown: DataFrame,
    pub regional: DataFrame,
    pub channel: DataFrame,
    pub top_products: DataFrame,
    pub year_over_year: DataFrame,
    pub payment_mix: DataFrame,
    pub return_rate: DataFrame,
    pub rating: DataFrame,
    pub discount_impact: DataFrame,
    pub day_of_week: DataFrame,
}

impl ViewModel {
    pub fn view(&self, kind: ViewKind) -> Result<DataFrame> {
        Ok(match kind {
            ViewKind::Kpi => self.kpis.to_frame()?,
            ViewKind::MonthlyTrend => self.monthly_trend.clone(),
            ViewKind::CategoryBreakdown => self.category_breakdown.clone(),
            ViewKind::Regional => self.regional.clone(),
            ViewKind::Channel => self.channel.clone(),
            ViewKind::TopProducts => self.top_products.clone(),
            ViewKind::YearOverYear => self.year_over_year.clone(),
            ViewKind::PaymentMix => self.payment_mix.clone(),
            ViewKind::ReturnRate => self.return_rate.clone(),
            ViewKind::Rating => self.rating.clone(),
            ViewKind::DiscountImpact => self.discount_impact.clone(),
            ViewKind::DayOfWeek => self.day_of_week.clone(),
        })
    }

    /// All views as tables, in page order.
    pub fn views(&self) -> Result<Vec<(ViewKind, DataFrame)>> {
        ViewKind::ALL
            .into_iter()
            .map(|kind| Ok((kind, self.view(kind)?)))
            .collect()
    }
}

/// The loaded order table plus the pure render entry points.
///
/// Holds no state besides the table, so `render` can be called on every
/// interaction without anything accumulating between calls.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: SalesTable,
}

impl Dashboard {
    pub fn new(table: SalesTable) -> Self {
        Self { table }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(SalesTable::load(path)?))
    }

    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    pub fn filter_options(&self) -> Result<FilterOptions> {
        self.table.filter_options()
    }

    /// The initial "everything selected" filter.
    pub fn default_filter(&self) -> Result<FilterSpec> {
        Ok(FilterSpec::all(&self.filter_options()?))
    }

    pub fn render(&self, spec: &FilterSpec) -> Result<ViewModel> {
        let filtered = self.table.filter(spec)?;
        debug!(orders = filtered.len(), "rendering views");

        Ok(ViewModel {
            selection: filtered.selection_summary()?,
            kpis: aggregation::kpi_summary(&filtered)?,
            monthly_trend: aggregation::monthly_trend(&filtered)?,
            category_breakdown: aggregation::category_breakdown(&filtered)?,
            regional: aggregation::regional(&filtered)?,
            channel: aggregation::channel_performance(&filtered)?,
            top_products: aggregation::top_products(&filtered)?,
            year_over_year: aggregation::year_over_year(&filtered)?,
            payment_mix: aggregation::payment_mix(&filtered)?,
            return_rate: aggregation::return_rate(&filtered)?,
            rating: aggregation::rating_by_category(&filtered)?,
            discount_impact: aggregation::discount_impact(&filtered)?,
            day_of_week: aggregation::day_of_week(&filtered)?,
            filtered,
        })
    }

    /// Raw-data explorer over the filtered rows.
    pub fn explore(&self, spec: &FilterSpec, term: &str, rows: usize) -> Result<DataFrame> {
        search::explore(&self.table.filter(spec)?, term, rows)
    }
}
