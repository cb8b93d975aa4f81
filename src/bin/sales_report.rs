//! Headless report: load the sales file, select everything and print every
//! dashboard view as JSON.
//!
//! Run: sales-report [--config FILE] [DATA_FILE]

use anyhow::{Context, Result};
use clap::Parser;
use sales_panda::config::{load_config, CliArgs};
use sales_panda::data::filter::FilterSpec;
use sales_panda::data::loader;
use sales_panda::data::report::SalesReport;
use serde::Serialize;

#[derive(Serialize)]
struct ReportOutput<'a> {
    source: String,
    loaded_sales: usize,
    dropped_rows: usize,
    top_n: usize,
    report: &'a SalesReport,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let config = load_config(args.config.as_deref())?;
    let path = args.data_path(&config);

    let dataset =
        loader::load_file(&path).with_context(|| format!("loading {}", path.display()))?;
    let top_n = config.dashboard.top_n;
    let report = SalesReport::compute(&dataset, &FilterSpec::select_all(&dataset), top_n);

    let output = ReportOutput {
        source: path.display().to_string(),
        loaded_sales: dataset.len(),
        dropped_rows: dataset.dropped_rows,
        top_n,
        report: &report,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("serializing report")?
    );
    Ok(())
}
