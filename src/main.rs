//! sales-pulse - terminal rendering of the sales dashboard.
//!
//! Loads the order file once, applies the filter given on the command line
//! and prints every view followed by the raw-data explorer.
//!
//! ```bash
//! # Everything selected
//! sales-pulse
//!
//! # 2023 electronics sold through the website, rows mentioning "pune"
//! sales-pulse --years 2023 --categories Electronics --channels Website --search pune
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use sales_pulse::generator::{group_thousands, DEFAULT_OUTPUT};
use sales_pulse::schema::display;
use sales_pulse::{Dashboard, FilterSpec, Result};

/// Sales analytics dashboard over the synthetic order dataset
#[derive(Parser)]
#[command(name = "sales-pulse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Order CSV produced by generate-data
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    data: PathBuf,

    /// Years to include (comma-separated, default: all)
    #[arg(long, value_delimiter = ',')]
    years: Option<Vec<i32>>,

    /// Categories to include (comma-separated, default: all)
    #[arg(long, value_delimiter = ',')]
    categories: Option<Vec<String>>,

    /// Regions to include (comma-separated, default: all)
    #[arg(long, value_delimiter = ',')]
    regions: Option<Vec<String>>,

    /// Channels to include (comma-separated, default: all)
    #[arg(long, value_delimiter = ',')]
    channels: Option<Vec<String>>,

    /// Case-insensitive text filter for the raw-data table
    #[arg(short, long, default_value = "")]
    search: String,

    /// Rows shown in the raw-data table (10, 25, 50 or 100)
    #[arg(short, long, default_value_t = 10, value_parser = parse_rows)]
    rows: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_rows(value: &str) -> std::result::Result<usize, String> {
    let rows: usize = value.parse().map_err(|e| format!("{e}"))?;
    if display::ROW_CHOICES.contains(&rows) {
        Ok(rows)
    } else {
        Err(format!("expected one of {:?}", display::ROW_CHOICES))
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Start from "everything selected" and narrow the dimensions given.
fn build_filter(dashboard: &Dashboard, cli: &Cli) -> Result<FilterSpec> {
    let mut spec = dashboard.default_filter()?;
    if let Some(years) = &cli.years {
        spec = spec.with_years(years.iter().copied());
    }
    if let Some(categories) = &cli.categories {
        spec = spec.with_categories(categories.iter().map(|s| s.trim().to_string()));
    }
    if let Some(regions) = &cli.regions {
        spec = spec.with_regions(regions.iter().map(|s| s.trim().to_string()));
    }
    if let Some(channels) = &cli.channels {
        spec = spec.with_channels(channels.iter().map(|s| s.trim().to_string()));
    }
    Ok(spec)
}

fn run(cli: &Cli) -> Result<()> {
    let dashboard = Dashboard::load(&cli.data)?;
    let spec = build_filter(&dashboard, cli)?;
    let model = dashboard.render(&spec)?;

    println!(
        "{} orders selected | {} cities | {} products",
        model.selection.orders, model.selection.cities, model.selection.products
    );
    println!(
        "Revenue ₹{} | Profit ₹{} | Avg order ₹{} | Margin {:.1}%",
        group_thousands(model.kpis.total_revenue),
        group_thousands(model.kpis.total_profit),
        group_thousands(model.kpis.avg_order_value),
        model.kpis.profit_margin
    );

    for (kind, df) in model.views()? {
        println!("\n── {kind} ──\n{df}");
    }

    let raw = dashboard.explore(&spec, &cli.search, cli.rows)?;
    println!("\n── Raw Data Explorer ──\n{raw}");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
