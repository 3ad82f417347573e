//! Synthetic order generator.
//!
//! Produces a chronologically ordered, seed-reproducible table of retail
//! orders drawn from the reference data in [`crate::catalog`], and writes it
//! as a CSV file with the column order of [`crate::schema::order::ALL`].

use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::catalog::{
    CATEGORIES, CHANNELS, DISCOUNTS, FESTIVE_MONTHS, MARGIN_RANGE, PAYMENT_METHODS, QUANTITIES,
    RATINGS, REGIONS, RETURN_PROBABILITY,
};
use crate::error::{DashError, Result};
use crate::round_to;
use crate::schema::order;

pub const DEFAULT_OUTPUT: &str = "data/sales_data.csv";

pub const WINDOW_START: NaiveDate = calendar_date(2022, 1, 1);
pub const WINDOW_END: NaiveDate = calendar_date(2024, 12, 31);

const fn calendar_date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid calendar date"),
    }
}

/// Configuration for the order generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// First day of the generation window.
    pub start: NaiveDate,
    /// End of the window (exclusive for drawn dates).
    pub end: NaiveDate,
    /// Number of orders to emit.
    pub orders: usize,
    /// Seed for the portable ChaCha RNG.
    pub seed: u64,
    /// Number of the first order identifier (`ORD-<offset>`).
    pub id_offset: u64,
    /// Chance that a draw landing in Oct-Dec is redrawn once.
    pub festive_resample_probability: f64,
    /// Target CSV path.
    pub output: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start: WINDOW_START,
            end: WINDOW_END,
            orders: 5000,
            seed: 42,
            id_offset: 10_000,
            festive_resample_probability: 0.3,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.end <= self.start {
            return Err(DashError::InvalidData(format!(
                "generation window is empty: {} to {}",
                self.start, self.end
            )));
        }
        if self.orders == 0 {
            return Err(DashError::InvalidData(
                "order count must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.festive_resample_probability) {
            return Err(DashError::InvalidData(format!(
                "resample probability {} is outside [0, 1]",
                self.festive_resample_probability
            )));
        }
        Ok(())
    }
}

/// One generated order. Categorical fields point into the static catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: String,
    pub date: NaiveDate,
    pub category: &'static str,
    pub product: &'static str,
    pub unit_price: f64,
    pub quantity: i64,
    pub discount: i64,
    pub revenue: f64,
    pub profit: f64,
    pub region: &'static str,
    pub city: &'static str,
    pub channel: &'static str,
    pub payment_method: &'static str,
    pub rating: f64,
    pub returned: bool,
}

impl OrderRecord {
    /// `Jan 2023` style label.
    pub fn month_label(&self) -> String {
        self.date.format("%b %Y").to_string()
    }

    /// `Q1 2023` style label.
    pub fn quarter_label(&self) -> String {
        format!("Q{} {}", (self.date.month() - 1) / 3 + 1, self.date.year())
    }
}

/// Revenue after discount, rounded to cents.
pub fn revenue_for(unit_price: f64, quantity: i64, discount: i64) -> f64 {
    round_to(
        unit_price * quantity as f64 * (1.0 - discount as f64 / 100.0),
        2,
    )
}

/// Order generator holding the RNG and the pre-built weighted samplers.
pub struct SalesGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
    categories: WeightedIndex<f64>,
    quantities: WeightedIndex<f64>,
    discounts: WeightedIndex<f64>,
    channels: WeightedIndex<f64>,
    payments: WeightedIndex<f64>,
    ratings: WeightedIndex<f64>,
}

impl SalesGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            categories: WeightedIndex::new(CATEGORIES.iter().map(|c| c.weight))?,
            quantities: WeightedIndex::new(QUANTITIES.iter().map(|(_, w)| *w))?,
            discounts: WeightedIndex::new(DISCOUNTS.iter().map(|(_, w)| *w))?,
            channels: WeightedIndex::new(CHANNELS.iter().map(|(_, w)| *w))?,
            payments: WeightedIndex::new(PAYMENT_METHODS.iter().map(|(_, w)| *w))?,
            ratings: WeightedIndex::new(RATINGS.iter().map(|(_, w)| *w))?,
            config,
        })
    }

    /// Generate the configured number of orders in date order.
    pub fn generate(&mut self) -> Vec<OrderRecord> {
        let mut dates = self.draw_dates();
        dates.sort();
        debug!(orders = dates.len(), "drawing order attributes");

        dates
            .into_iter()
            .enumerate()
            .map(|(i, date)| self.draw_order(i, date))
            .collect()
    }

    fn draw_dates(&mut self) -> Vec<NaiveDate> {
        let span = (self.config.end - self.config.start).num_days();
        let mut dates = Vec::with_capacity(self.config.orders);
        for _ in 0..self.config.orders {
            let mut date = self.draw_date(span);
            // Festive-season resample: a second draw, not a multiplier.
            if FESTIVE_MONTHS.contains(&date.month())
                && self.rng.gen::<f64>() < self.config.festive_resample_probability
            {
                date = self.draw_date(span);
            }
            dates.push(date);
        }
        dates
    }

    fn draw_date(&mut self, span: i64) -> NaiveDate {
        self.config.start + chrono::Duration::days(self.rng.gen_range(0..span))
    }

    fn draw_order(&mut self, index: usize, date: NaiveDate) -> OrderRecord {
        let category = &CATEGORIES[self.categories.sample(&mut self.rng)];
        let product = category.products[self.rng.gen_range(0..category.products.len())];

        let (low, high) = category.price_range;
        let unit_price = round_to(self.rng.gen_range(low..high), 2);
        let quantity = QUANTITIES[self.quantities.sample(&mut self.rng)].0;
        let discount = DISCOUNTS[self.discounts.sample(&mut self.rng)].0;
        let revenue = revenue_for(unit_price, quantity, discount);
        let margin = self.rng.gen_range(MARGIN_RANGE.0..MARGIN_RANGE.1);
        let profit = round_to(revenue * margin, 2);

        let region = &REGIONS[self.rng.gen_range(0..REGIONS.len())];
        let city = region.cities[self.rng.gen_range(0..region.cities.len())];
        let channel = CHANNELS[self.channels.sample(&mut self.rng)].0;
        let payment_method = PAYMENT_METHODS[self.payments.sample(&mut self.rng)].0;
        let rating = RATINGS[self.ratings.sample(&mut self.rng)].0;
        let returned = self.rng.gen_bool(RETURN_PROBABILITY);

        OrderRecord {
            order_id: format!("ORD-{}", self.config.id_offset + index as u64),
            date,
            category: category.name,
            product,
            unit_price,
            quantity,
            discount,
            revenue,
            profit,
            region: region.name,
            city,
            channel,
            payment_method,
            rating,
            returned,
        }
    }
}

/// Build the file-shaped DataFrame (fixed column order, ISO dates).
pub fn to_frame(records: &[OrderRecord]) -> Result<DataFrame> {
    let df = df!(
        order::ORDER_ID => records.iter().map(|r| r.order_id.as_str()).collect::<Vec<_>>(),
        order::DATE => records.iter().map(|r| r.date.format("%Y-%m-%d").to_string()).collect::<Vec<_>>(),
        order::MONTH => records.iter().map(OrderRecord::month_label).collect::<Vec<_>>(),
        order::QUARTER => records.iter().map(OrderRecord::quarter_label).collect::<Vec<_>>(),
        order::YEAR => records.iter().map(|r| i64::from(r.date.year())).collect::<Vec<_>>(),
        order::CATEGORY => records.iter().map(|r| r.category).collect::<Vec<_>>(),
        order::PRODUCT => records.iter().map(|r| r.product).collect::<Vec<_>>(),
        order::UNIT_PRICE => records.iter().map(|r| r.unit_price).collect::<Vec<_>>(),
        order::QUANTITY => records.iter().map(|r| r.quantity).collect::<Vec<_>>(),
        order::DISCOUNT => records.iter().map(|r| r.discount).collect::<Vec<_>>(),
        order::REVENUE => records.iter().map(|r| r.revenue).collect::<Vec<_>>(),
        order::PROFIT => records.iter().map(|r| r.profit).collect::<Vec<_>>(),
        order::REGION => records.iter().map(|r| r.region).collect::<Vec<_>>(),
        order::CITY => records.iter().map(|r| r.city).collect::<Vec<_>>(),
        order::CHANNEL => records.iter().map(|r| r.channel).collect::<Vec<_>>(),
        order::PAYMENT_METHOD => records.iter().map(|r| r.payment_method).collect::<Vec<_>>(),
        order::RATING => records.iter().map(|r| r.rating).collect::<Vec<_>>(),
        order::RETURNED => records.iter().map(|r| i64::from(r.returned)).collect::<Vec<_>>()
    )?;
    Ok(df)
}

/// Write the records as CSV with a header row, creating parent directories.
pub fn write_csv(records: &[OrderRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut df = to_frame(records)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(())
}

/// Totals printed after a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub orders: usize,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub categories: usize,
    pub cities: usize,
}

impl GenerationSummary {
    pub fn from_records(records: &[OrderRecord]) -> Self {
        Self {
            orders: records.len(),
            total_revenue: records.iter().map(|r| r.revenue).sum(),
            total_profit: records.iter().map(|r| r.profit).sum(),
            first_date: records.iter().map(|r| r.date).min(),
            last_date: records.iter().map(|r| r.date).max(),
            categories: records
                .iter()
                .map(|r| r.category)
                .collect::<HashSet<_>>()
                .len(),
            cities: records.iter().map(|r| r.city).collect::<HashSet<_>>().len(),
        }
    }
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => format!("{first} to {last}"),
            _ => "n/a".to_string(),
        };
        writeln!(f, "Dataset saved: {} orders", self.orders)?;
        writeln!(f, "   Total Revenue: ₹{}", group_thousands(self.total_revenue))?;
        writeln!(f, "   Total Profit:  ₹{}", group_thousands(self.total_profit))?;
        writeln!(f, "   Date Range:    {range}")?;
        writeln!(f, "   Categories:    {}", self.categories)?;
        write!(f, "   Cities:        {}", self.cities)
    }
}

/// Whole-unit rendering with comma thousands separators.
pub fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 && digits != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Generate the dataset described by `config` and write it to `config.output`.
pub fn generate_dataset(config: &GeneratorConfig) -> Result<GenerationSummary> {
    let mut generator = SalesGenerator::new(config.clone())?;
    let records = generator.generate();
    write_csv(&records, &config.output)?;

    let summary = GenerationSummary::from_records(&records);
    info!(
        path = %config.output.display(),
        orders = summary.orders,
        seed = config.seed,
        "dataset written"
    );
    Ok(summary)
}
