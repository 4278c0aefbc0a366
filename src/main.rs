//! Retail EDA - Superstore Sales Dashboard
//!
//! Loads the retail CSV once, then opens the dashboard, prints the JSON
//! report, or exports static charts.

use anyhow::{Context, Result};
use eframe::egui;
use retail_eda::charts::ChartExporter;
use retail_eda::cli::{Args, Command};
use retail_eda::config::{Config, DEFAULT_CONFIG_FILE};
use retail_eda::data::{DataLoader, Dataset};
use retail_eda::gui::InsightsApp;
use retail_eda::insights::InsightEngine;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse_args();

    if args.init_config {
        let path = args
            .config
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        Config::write_default(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    init_logging(&args);

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(path) = &args.data {
        config.data.path = path.clone();
    }

    let dataset = DataLoader::new()
        .with_infer_schema_length(config.data.infer_schema_length)
        .load_retail(&config.data.path)
        .with_context(|| format!("Failed to load {}", config.data.path.display()))?;

    match args.command() {
        Command::Dashboard => run_dashboard(dataset, config),
        Command::Summary { pretty } => run_summary(&dataset, &config, pretty),
        Command::Export { out } => run_export(&dataset, &config, &out),
    }
}

/// Compact fmt subscriber; `RUST_LOG` overrides the level from the flags.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run_dashboard(dataset: Dataset, config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("Retail EDA"),
        ..Default::default()
    };

    eframe::run_native(
        "Retail EDA",
        options,
        Box::new(|cc| Ok(Box::new(InsightsApp::new(cc, dataset, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard failed: {}", e))
}

fn run_summary(dataset: &Dataset, config: &Config, pretty: bool) -> Result<()> {
    let report = InsightEngine::new(dataset, &config.analysis)
        .report()
        .context("Failed to compute insights")?;

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}

fn run_export(dataset: &Dataset, config: &Config, out: &Path) -> Result<()> {
    let report = InsightEngine::new(dataset, &config.analysis)
        .report()
        .context("Failed to compute insights")?;

    let written = ChartExporter::new(&config.export)
        .export_report(&report, out)
        .with_context(|| format!("Failed to export charts to {}", out.display()))?;

    info!(files = written.len(), "export finished");
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}
