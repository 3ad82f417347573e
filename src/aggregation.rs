//! Aggregate views over a (filtered) sales table.
//!
//! Every view is a pure function of the table it is given: group, reduce,
//! order for display. An empty input yields an empty view (or, for the KPI
//! summary, zeros) rather than an error. Ties in display ordering are broken
//! by the group key so repeated renders are identical.

use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::model::SalesTable;
use crate::round_to;
use crate::schema::{derived, measure, order, WEEKDAYS};

/// Number of products kept by [`top_products`].
pub const TOP_PRODUCTS: IdxSize = 10;

const FLAGGED: &str = "_flagged";
const DAY_INDEX: &str = "_day_index";

fn grouped(table: &SalesTable, keys: Vec<Expr>, aggs: Vec<Expr>) -> LazyFrame {
    table.frame().clone().lazy().group_by(keys).agg(aggs)
}

fn ascending() -> SortMultipleOptions {
    SortMultipleOptions::default().with_maintain_order(true)
}

/// Descending on the measure, ascending on the key.
fn measure_descending() -> SortMultipleOptions {
    SortMultipleOptions::default()
        .with_order_descending_multi([true, false])
        .with_maintain_order(true)
}

fn revenue_sum() -> Expr {
    col(order::REVENUE).sum().alias(measure::REVENUE)
}

fn profit_sum() -> Expr {
    col(order::PROFIT).sum().alias(measure::PROFIT)
}

fn order_count() -> Expr {
    col(order::ORDER_ID).count().alias(measure::ORDERS)
}

/// Revenue, profit and order count per `YYYY-MM`, chronological.
pub fn monthly_trend(table: &SalesTable) -> Result<DataFrame> {
    let df = grouped(
        table,
        vec![col(derived::MONTH_NUM)],
        vec![revenue_sum(), profit_sum(), order_count()],
    )
    .sort([derived::MONTH_NUM], ascending())
    .collect()?;
    debug!(rows = df.height(), "monthly trend");
    Ok(df)
}

/// Revenue per category, largest first.
pub fn category_breakdown(table: &SalesTable) -> Result<DataFrame> {
    let df = grouped(table, vec![col(order::CATEGORY)], vec![revenue_sum()])
        .sort([measure::REVENUE, order::CATEGORY], measure_descending())
        .collect()?;
    Ok(df)
}

/// Revenue, orders and profit per region, smallest revenue first
/// (the horizontal bar chart draws bottom-up).
pub fn regional(table: &SalesTable) -> Result<DataFrame> {
    let df = grouped(
        table,
        vec![col(order::REGION)],
        vec![revenue_sum(), order_count(), profit_sum()],
    )
    .sort([measure::REVENUE, order::REGION], ascending())
    .collect()?;
    Ok(df)
}

pub fn channel_performance(table: &SalesTable) -> Result<DataFrame> {
    let df = grouped(
        table,
        vec![col(order::CHANNEL)],
        vec![
            revenue_sum(),
            order_count(),
            col(order::REVENUE).mean().alias(measure::AVG_ORDER),
        ],
    )
    .sort([measure::REVENUE, order::CHANNEL], measure_descending())
    .collect()?;
    Ok(df)
}

/// The ten best-selling products by revenue, in ascending order for display.
pub fn top_products(table: &SalesTable) -> Result<DataFrame> {
    let df = grouped(table, vec![col(order::PRODUCT)], vec![revenue_sum()])
        .sort([measure::REVENUE, order::PRODUCT], measure_descending())
        .limit(TOP_PRODUCTS)
        .sort([measure::REVENUE, order::PRODUCT], ascending())
        .collect()?;
    Ok(df)
}

/// Revenue per (year, category), grouped by category then year.
pub fn year_over_year(table: &SalesTable) -> Result<DataFrame> {
    let df = grouped(
        table,
        vec![col(order::YEAR), col(order::CATEGORY)],
        vec![revenue_sum()],
    )
    .sort([order::CATEGORY, order::YEAR], ascending())
    .collect()?;
    Ok(df)
}

/// Order count per payment method, most used first.
pub fn payment_mix(table: &SalesTable) -> Result<DataFrame> {
    let df = grouped(
        table,
        vec![col(order::PAYMENT_METHOD).alias(measure::METHOD)],
        vec![col(order::ORDER_ID).count().alias(measure::COUNT)],
    )
    .sort([measure::COUNT, measure::METHOD], measure_descending())
    .collect()?;
    Ok(df)
}

/// Returned share of orders per category, as a percentage with one decimal,
/// highest first. Only rows with a returned flag count towards the rate.
pub fn return_rate(table: &SalesTable) -> Result<DataFrame> {
    let mut df = grouped(
        table,
        vec![col(order::CATEGORY)],
        vec![
            col(order::ORDER_ID).count().alias(measure::TOTAL_ORDERS),
            col(order::RETURNED).sum().alias(measure::RETURNS),
            col(order::RETURNED).count().alias(FLAGGED),
        ],
    )
    .collect()?;

    let returns = df.column(measure::RETURNS)?.cast(&DataType::Float64)?;
    let flagged = df.column(FLAGGED)?.cast(&DataType::Float64)?;
    let rates: Vec<f64> = returns
        .as_materialized_series()
        .f64()?
        .into_iter()
        .zip(flagged.as_materialized_series().f64()?.into_iter())
        .map(|(r, n)| match (r, n) {
            (Some(r), Some(n)) if n > 0.0 => round_to(r / n * 100.0, 1),
            _ => 0.0,
        })
        .collect();

    df.with_column(Series::new(measure::RETURN_RATE.into(), rates))?;
    let df = df
        .drop(FLAGGED)?
        .sort([measure::RETURN_RATE, order::CATEGORY], measure_descending())?;
    Ok(df)
}

/// Mean rating per category (two decimals), lowest first.
pub fn rating_by_category(table: &SalesTable) -> Result<DataFrame> {
    // A lone `mean()` takes the partitioned group-by path; spell it out.
    let mean = col(order::RATING).sum() / col(order::RATING).count().cast(DataType::Float64);
    let mut df = grouped(
        table,
        vec![col(order::CATEGORY)],
        vec![mean.alias(measure::RATING)],
    )
    .collect()?;
    round_column(&mut df, measure::RATING, 2)?;
    let df = df.sort([measure::RATING, order::CATEGORY], ascending())?;
    Ok(df)
}

/// Revenue, orders and average order revenue per discount level.
pub fn discount_impact(table: &SalesTable) -> Result<DataFrame> {
    let df = grouped(
        table,
        vec![col(order::DISCOUNT)],
        vec![
            revenue_sum(),
            order_count(),
            col(order::REVENUE).mean().alias(measure::AVG_REVENUE),
        ],
    )
    .sort([order::DISCOUNT], ascending())
    .collect()?;
    Ok(df)
}

/// Orders and revenue per weekday, always seven rows Monday to Sunday.
/// Weekdays without orders report zero.
pub fn day_of_week(table: &SalesTable) -> Result<DataFrame> {
    let counts = grouped(
        table,
        vec![col(derived::DAY_OF_WEEK)],
        vec![order_count(), revenue_sum()],
    );

    let calendar = df!(
        derived::DAY_OF_WEEK => WEEKDAYS.to_vec(),
        DAY_INDEX => (0..WEEKDAYS.len() as u32).collect::<Vec<u32>>()
    )?;

    let df = calendar
        .lazy()
        .join(
            counts,
            [col(derived::DAY_OF_WEEK)],
            [col(derived::DAY_OF_WEEK)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([DAY_INDEX], ascending())
        .select([
            col(derived::DAY_OF_WEEK),
            col(measure::ORDERS).fill_null(lit(0)),
            col(measure::REVENUE).fill_null(lit(0.0)),
        ])
        .collect()?;
    Ok(df)
}

/// Headline figures of the whole selection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KpiSummary {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub total_orders: usize,
    pub avg_order_value: f64,
    /// Profit as a percentage of revenue; 0 when there is no revenue.
    pub profit_margin: f64,
}

impl KpiSummary {
    /// Single-row table form for presentation layers that only take frames.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = df!(
            measure::TOTAL_REVENUE => vec![self.total_revenue],
            measure::TOTAL_PROFIT => vec![self.total_profit],
            measure::TOTAL_ORDERS => vec![self.total_orders as u64],
            measure::AVG_ORDER_VALUE => vec![self.avg_order_value],
            measure::PROFIT_MARGIN => vec![self.profit_margin]
        )?;
        Ok(df)
    }
}

pub fn kpi_summary(table: &SalesTable) -> Result<KpiSummary> {
    let df = table.frame();

    let total_revenue = column_sum(df, order::REVENUE)?;
    let total_profit = column_sum(df, order::PROFIT)?;
    let avg_order_value = df
        .column(order::REVENUE)?
        .as_materialized_series()
        .mean_reduce()
        .value()
        .try_extract::<f64>()
        .unwrap_or(0.0);
    let profit_margin = if total_revenue > 0.0 {
        total_profit / total_revenue * 100.0
    } else {
        0.0
    };

    Ok(KpiSummary {
        total_revenue,
        total_profit,
        total_orders: df.height(),
        avg_order_value: if avg_order_value.is_nan() {
            0.0
        } else {
            avg_order_value
        },
        profit_margin,
    })
}

fn column_sum(df: &DataFrame, column: &str) -> Result<f64> {
    let s = df.column(column)?.as_materialized_series();
    let val = s.sum_reduce()?;
    Ok(val.value().try_extract::<f64>().unwrap_or(0.0))
}

fn round_column(df: &mut DataFrame, column: &str, decimals: i32) -> Result<()> {
    let rounded: Vec<Option<f64>> = df
        .column(column)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.map(|x| round_to(x, decimals)))
        .collect();
    df.with_column(Series::new(column.into(), rounded))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{revenue_for, OrderRecord};
    use chrono::NaiveDate;

    fn record(
        id: usize,
        date: (i32, u32, u32),
        category: &'static str,
        product: &'static str,
        unit_price: f64,
        returned: bool,
    ) -> OrderRecord {
        OrderRecord {
            order_id: format!("ORD-{}", 10_000 + id),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            category,
            product,
            unit_price,
            quantity: 1,
            discount: 0,
            revenue: revenue_for(unit_price, 1, 0),
            profit: round_to(unit_price * 0.2, 2),
            region: "North",
            city: "Delhi",
            channel: "Website",
            payment_method: "UPI",
            rating: 4.0,
            returned,
        }
    }

    fn table(records: &[OrderRecord]) -> SalesTable {
        SalesTable::from_records(records).unwrap()
    }

    fn strings(df: &DataFrame, name: &str) -> Vec<String> {
        df.column(name)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    }

    fn floats(df: &DataFrame, name: &str) -> Vec<f64> {
        let c = df.column(name).unwrap().cast(&DataType::Float64).unwrap();
        c.as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect()
    }

    fn sample() -> SalesTable {
        table(&[
            // 2022-01-03 is a Monday, 2022-01-05 a Wednesday.
            record(0, (2022, 1, 3), "Electronics", "Laptop", 100.0, false),
            record(1, (2022, 1, 5), "Clothing", "Jeans", 50.0, true),
            record(2, (2022, 2, 5), "Clothing", "Dress", 30.0, false),
            record(3, (2023, 2, 6), "Electronics", "Tablet", 200.0, true),
        ])
    }

    #[test]
    fn monthly_trend_is_chronological() {
        let df = monthly_trend(&sample()).unwrap();
        assert_eq!(strings(&df, derived::MONTH_NUM), vec!["2022-01", "2022-02", "2023-02"]);
        assert_eq!(floats(&df, measure::REVENUE), vec![150.0, 30.0, 200.0]);
        assert_eq!(floats(&df, measure::ORDERS), vec![2.0, 1.0, 1.0]);
    }

    #[test]
    fn category_breakdown_sums_to_total() {
        let t = sample();
        let df = category_breakdown(&t).unwrap();
        assert_eq!(strings(&df, order::CATEGORY), vec!["Electronics", "Clothing"]);
        let total: f64 = floats(&df, measure::REVENUE).iter().sum();
        assert!((total - kpi_summary(&t).unwrap().total_revenue).abs() < 1e-6);
    }

    #[test]
    fn top_products_are_ascending_for_display() {
        let df = top_products(&sample()).unwrap();
        assert_eq!(
            strings(&df, order::PRODUCT),
            vec!["Dress", "Jeans", "Laptop", "Tablet"]
        );
    }

    #[test]
    fn top_products_keeps_ten() {
        let products: [&'static str; 12] = [
            "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L",
        ];
        let records: Vec<OrderRecord> = products
            .iter()
            .enumerate()
            .map(|(i, p)| record(i, (2022, 3, 1), "Books", *p, 10.0 + i as f64, false))
            .collect();
        let df = top_products(&table(&records)).unwrap();
        assert_eq!(df.height(), 10);
        assert_eq!(strings(&df, order::PRODUCT).first().map(String::as_str), Some("C"));
        assert_eq!(strings(&df, order::PRODUCT).last().map(String::as_str), Some("L"));
    }

    #[test]
    fn return_rate_per_category() {
        let df = return_rate(&sample()).unwrap();
        // Equal rates fall back to category order.
        assert_eq!(strings(&df, order::CATEGORY), vec!["Clothing", "Electronics"]);
        assert_eq!(floats(&df, measure::RETURN_RATE), vec![50.0, 50.0]);
        assert_eq!(floats(&df, measure::TOTAL_ORDERS), vec![2.0, 2.0]);
        assert!(df.column(FLAGGED).is_err());
    }

    #[test]
    fn rating_is_rounded_and_ascending() {
        let mut records = vec![
            record(0, (2022, 1, 3), "Books", "Comic", 10.0, false),
            record(1, (2022, 1, 3), "Books", "Comic", 10.0, false),
            record(2, (2022, 1, 3), "Books", "Comic", 10.0, false),
            record(3, (2022, 1, 3), "Beauty", "Serum", 10.0, false),
        ];
        records[0].rating = 5.0;
        records[1].rating = 4.5;
        records[2].rating = 4.5;
        records[3].rating = 3.0;
        let df = rating_by_category(&table(&records)).unwrap();
        assert_eq!(strings(&df, order::CATEGORY), vec!["Beauty", "Books"]);
        assert_eq!(floats(&df, measure::RATING), vec![3.0, 4.67]);
    }

    #[test]
    fn rating_halves_round_to_even() {
        let mut records: Vec<OrderRecord> = (0..8)
            .map(|i| record(i, (2022, 1, 3), "Books", "Comic", 10.0, false))
            .collect();
        records[7].rating = 5.0;
        let df = rating_by_category(&table(&records)).unwrap();
        // 33 / 8 = 4.125
        assert_eq!(floats(&df, measure::RATING), vec![4.12]);
    }

    #[test]
    fn return_rate_halves_round_to_even() {
        let records: Vec<OrderRecord> = (0..16)
            .map(|i| record(i, (2022, 1, 3), "Books", "Comic", 10.0, i == 0))
            .collect();
        let df = return_rate(&table(&records)).unwrap();
        assert_eq!(floats(&df, measure::TOTAL_ORDERS), vec![16.0]);
        assert_eq!(floats(&df, measure::RETURNS), vec![1.0]);
        // 1 / 16 = 6.25%
        assert_eq!(floats(&df, measure::RETURN_RATE), vec![6.2]);
    }

    #[test]
    fn regional_is_smallest_revenue_first() {
        let mut records = vec![
            record(0, (2022, 1, 3), "Books", "Comic", 100.0, false),
            record(1, (2022, 1, 3), "Books", "Comic", 50.0, false),
            record(2, (2022, 1, 3), "Books", "Comic", 200.0, false),
            record(3, (2022, 1, 3), "Books", "Comic", 50.0, false),
            record(4, (2022, 1, 4), "Books", "Comic", 30.0, false),
        ];
        records[1].region = "South";
        records[2].region = "West";
        records[3].region = "East";
        records[4].region = "West";
        let df = regional(&table(&records)).unwrap();
        // East and South tie on revenue and fall back to name order.
        assert_eq!(
            strings(&df, order::REGION),
            vec!["East", "South", "North", "West"]
        );
        assert_eq!(floats(&df, measure::REVENUE), vec![50.0, 50.0, 100.0, 230.0]);
        assert_eq!(floats(&df, measure::ORDERS), vec![1.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn year_over_year_groups_category_then_year() {
        let df = year_over_year(&sample()).unwrap();
        assert_eq!(
            strings(&df, order::CATEGORY),
            vec!["Clothing", "Electronics", "Electronics"]
        );
        assert_eq!(floats(&df, order::YEAR), vec![2022.0, 2022.0, 2023.0]);
        assert_eq!(floats(&df, measure::REVENUE), vec![80.0, 100.0, 200.0]);
    }

    #[test]
    fn day_of_week_always_has_seven_rows() {
        let df = day_of_week(&sample()).unwrap();
        assert_eq!(df.height(), 7);
        assert_eq!(strings(&df, derived::DAY_OF_WEEK), WEEKDAYS.to_vec());
        // 2022-01-03 and 2023-02-06 are Mondays; 2022-02-05 is a Saturday.
        assert_eq!(
            floats(&df, measure::ORDERS),
            vec![2.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0]
        );
        assert_eq!(floats(&df, measure::REVENUE)[1], 0.0);
    }

    #[test]
    fn discount_levels_ascend() {
        let mut records = vec![
            record(0, (2022, 1, 3), "Books", "Comic", 100.0, false),
            record(1, (2022, 1, 3), "Books", "Comic", 100.0, false),
        ];
        records[0].discount = 20;
        records[0].revenue = revenue_for(100.0, 1, 20);
        let df = discount_impact(&table(&records)).unwrap();
        assert_eq!(floats(&df, order::DISCOUNT), vec![0.0, 20.0]);
        assert_eq!(floats(&df, measure::AVG_REVENUE), vec![100.0, 80.0]);
    }

    #[test]
    fn kpi_summary_of_sample() {
        let kpi = kpi_summary(&sample()).unwrap();
        assert_eq!(kpi.total_orders, 4);
        assert!((kpi.total_revenue - 380.0).abs() < 1e-9);
        assert!((kpi.avg_order_value - 95.0).abs() < 1e-9);
        assert!((kpi.profit_margin - kpi.total_profit / 380.0 * 100.0).abs() < 1e-9);
        assert_eq!(kpi.to_frame().unwrap().height(), 1);
    }

    #[test]
    fn empty_table_gives_empty_views_and_zero_kpis() {
        let empty = sample()
            .filter(&crate::filter::FilterSpec::default())
            .unwrap();
        assert!(empty.is_empty());

        assert_eq!(monthly_trend(&empty).unwrap().height(), 0);
        assert_eq!(category_breakdown(&empty).unwrap().height(), 0);
        assert_eq!(regional(&empty).unwrap().height(), 0);
        assert_eq!(channel_performance(&empty).unwrap().height(), 0);
        assert_eq!(top_products(&empty).unwrap().height(), 0);
        assert_eq!(year_over_year(&empty).unwrap().height(), 0);
        assert_eq!(payment_mix(&empty).unwrap().height(), 0);
        assert_eq!(return_rate(&empty).unwrap().height(), 0);
        assert_eq!(rating_by_category(&empty).unwrap().height(), 0);
        assert_eq!(discount_impact(&empty).unwrap().height(), 0);

        let dow = day_of_week(&empty).unwrap();
        assert_eq!(dow.height(), 7);
        assert!(floats(&dow, measure::ORDERS).iter().all(|v| *v == 0.0));

        let kpi = kpi_summary(&empty).unwrap();
        assert_eq!(kpi, KpiSummary::default());
    }
}
