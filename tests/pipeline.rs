use std::fs;
use std::path::PathBuf;

use polars::prelude::*;

use sales_pulse::aggregation;
use sales_pulse::schema::{derived, measure, order};
use sales_pulse::{DashError, Dashboard, FilterSpec, SalesTable};

const HEADER: &str = "OrderID,Date,Month,Quarter,Year,Category,Product,UnitPrice,Quantity,Discount,Revenue,Profit,Region,City,Channel,PaymentMethod,Rating,Returned";

fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, format!("{HEADER}\n{body}")).unwrap();
    path
}

/// The worked example: two 2022 orders and one 2023 order.
fn example_table(dir: &tempfile::TempDir) -> SalesTable {
    let path = write_csv(
        dir,
        "example.csv",
        "ORD-10000,2022-03-01,Mar 2022,Q1 2022,2022,Electronics,Laptop,100.0,1,0,100.0,20.0,North,Delhi,Website,UPI,4.5,0\n\
         ORD-10001,2022-07-15,Jul 2022,Q3 2022,2022,Clothing,Jeans,50.0,1,0,50.0,10.0,South,Chennai,Direct,COD,4.0,1\n\
         ORD-10002,2023-01-09,Jan 2023,Q1 2023,2023,Electronics,Tablet,200.0,1,0,200.0,60.0,West,Pune,Mobile App,UPI,5.0,0\n",
    );
    SalesTable::load(path).unwrap()
}

fn strings(df: &DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .cast(&DataType::String)
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

fn everything(table: &SalesTable) -> FilterSpec {
    FilterSpec::all(&table.filter_options().unwrap())
}

#[test]
fn worked_example() {
    let dir = tempfile::tempdir().unwrap();
    let table = example_table(&dir);

    let spec = everything(&table).with_years([2022]);
    let filtered = table.filter(&spec).unwrap();
    assert_eq!(filtered.len(), 2);

    let breakdown = aggregation::category_breakdown(&filtered).unwrap();
    assert_eq!(strings(&breakdown, order::CATEGORY), vec!["Electronics", "Clothing"]);
    assert_eq!(floats(&breakdown, measure::REVENUE), vec![100.0, 50.0]);

    let kpi = aggregation::kpi_summary(&filtered).unwrap();
    assert_eq!(kpi.total_revenue, 150.0);
    assert_eq!(kpi.total_orders, 2);
    assert!((kpi.profit_margin - 20.0).abs() < 1e-9);
}

#[test]
fn filtered_rows_are_members_of_every_selection() {
    let dir = tempfile::tempdir().unwrap();
    let table = example_table(&dir);

    let spec = everything(&table)
        .with_categories(["Electronics"])
        .with_regions(["North", "West"]);
    let filtered = table.filter(&spec).unwrap();
    assert!(filtered.len() <= table.len());
    assert_eq!(filtered.len(), 2);

    let df = filtered.frame();
    for c in strings(df, order::CATEGORY) {
        assert!(spec.categories.contains(&c));
    }
    for r in strings(df, order::REGION) {
        assert!(spec.regions.contains(&r));
    }
    for y in floats(df, order::YEAR) {
        assert!(spec.years.contains(&(y as i32)));
    }
}

#[test]
fn any_empty_dimension_yields_zero_rows() {
    let dir = tempfile::tempdir().unwrap();
    let table = example_table(&dir);
    let full = everything(&table);

    let cleared = [
        full.clone().with_years([]),
        full.clone().with_categories(Vec::<String>::new()),
        full.clone().with_regions(Vec::<String>::new()),
        full.clone().with_channels(Vec::<String>::new()),
    ];
    for spec in cleared {
        assert_eq!(table.filter(&spec).unwrap().len(), 0);
    }
    // The source table is untouched.
    assert_eq!(table.len(), 3);
}

#[test]
fn unknown_values_match_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let table = example_table(&dir);
    let spec = everything(&table).with_categories(["Groceries"]);
    assert!(table.filter(&spec).unwrap().is_empty());
}

#[test]
fn derived_columns_come_from_date() {
    let dir = tempfile::tempdir().unwrap();
    let table = example_table(&dir);
    let df = table.frame();
    assert_eq!(
        strings(df, derived::MONTH_NUM),
        vec!["2022-03", "2022-07", "2023-01"]
    );
    assert_eq!(
        strings(df, derived::DAY_OF_WEEK),
        vec!["Tuesday", "Friday", "Monday"]
    );
    assert_eq!(floats(df, derived::WEEK_NUM), vec![9.0, 28.0, 2.0]);
}

#[test]
fn missing_file_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let err = SalesTable::load(dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, DashError::Io(_)));
}

#[test]
fn missing_column_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.csv");
    fs::write(&path, "OrderID,Date,Year\nORD-1,2022-01-01,2022\n").unwrap();
    let err = SalesTable::load(path).unwrap_err();
    assert!(matches!(err, DashError::MissingColumn(_)));
}

#[test]
fn unparseable_date_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "bad_date.csv",
        "ORD-10000,01/03/2022,Mar 2022,Q1 2022,2022,Books,Comic,10.0,1,0,10.0,2.0,East,Patna,Direct,UPI,4.0,0\n",
    );
    let err = SalesTable::load(path).unwrap_err();
    assert!(matches!(err, DashError::InvalidData(_)));
}

#[test]
fn malformed_number_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "bad_number.csv",
        "ORD-10000,2022-03-01,Mar 2022,Q1 2022,2022,Books,Comic,ten,1,0,10.0,2.0,East,Patna,Direct,UPI,4.0,0\n",
    );
    assert!(SalesTable::load(path).is_err());
}

#[test]
fn return_rate_with_missing_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "flags.csv",
        "ORD-1,2022-03-01,Mar 2022,Q1 2022,2022,Books,Comic,10.0,1,0,10.0,2.0,East,Patna,Direct,UPI,4.0,1\n\
         ORD-2,2022-03-02,Mar 2022,Q1 2022,2022,Books,Comic,10.0,1,0,10.0,2.0,East,Patna,Direct,UPI,4.0,0\n\
         ORD-3,2022-03-03,Mar 2022,Q1 2022,2022,Books,Comic,10.0,1,0,10.0,2.0,East,Patna,Direct,UPI,4.0,\n",
    );
    let table = SalesTable::load(path).unwrap();
    let df = aggregation::return_rate(&table).unwrap();
    assert_eq!(floats(&df, measure::TOTAL_ORDERS), vec![3.0]);
    assert_eq!(floats(&df, measure::RETURNS), vec![1.0]);
    // One return out of two flagged rows.
    assert_eq!(floats(&df, measure::RETURN_RATE), vec![50.0]);
}

#[test]
fn dashboard_renders_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "dash.csv",
        "ORD-10000,2022-03-01,Mar 2022,Q1 2022,2022,Electronics,Laptop,100.0,1,0,100.0,20.0,North,Delhi,Website,UPI,4.5,0\n\
         ORD-10001,2022-07-15,Jul 2022,Q3 2022,2022,Clothing,Jeans,50.0,1,0,50.0,10.0,South,Chennai,Direct,COD,4.0,1\n",
    );
    let dashboard = Dashboard::load(path).unwrap();
    let spec = dashboard.default_filter().unwrap();
    let model = dashboard.render(&spec).unwrap();

    assert_eq!(model.selection.orders, 2);
    assert_eq!(model.day_of_week.height(), 7);
    assert_eq!(strings(&model.payment_mix, measure::METHOD), vec!["COD", "UPI"]);
    assert_eq!(
        strings(&model.channel, order::CHANNEL),
        vec!["Website", "Direct"]
    );

    let raw = dashboard.explore(&spec, "chennai", 10).unwrap();
    assert_eq!(strings(&raw, order::ORDER_ID), vec!["ORD-10001"]);
}
