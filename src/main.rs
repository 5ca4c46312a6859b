use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use poisson_odds::config::RunConfig;
use poisson_odds::{dataset, export, predict};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Configuration faults stop the run before any table is read.
    let config = RunConfig::parse();
    config.validate()?;

    let (inputs, report) = dataset::load_inputs(&config.data_dir)
        .with_context(|| format!("load tables from {}", config.data_dir.display()))?;
    info!(
        data_dir = %report.data_dir.display(),
        results = report.results.loaded,
        fixtures = report.fixtures.loaded,
        recent_form = report.recent_form.loaded,
        segments = report.segments.loaded,
        skipped = report.skipped_total(),
        "tables loaded"
    );

    let pool = predict::build_pool(config.threads);
    let predictions = predict::with_pool(&pool, || predict::predict(&inputs, config.max_goals));

    export::write_predictions_json(&config.output, &predictions, config.max_goals)?;
    info!(
        rows = predictions.len(),
        max_goals = config.max_goals.get(),
        path = %config.output.display(),
        "predictions written"
    );

    if let Some(path) = config.export_xlsx.as_deref() {
        let quotes = match config.quotes.as_deref() {
            Some(quotes_path) => export::load_quotes(quotes_path)?.rows,
            None => Vec::new(),
        };
        let summary = export::export_workbook(path, &predictions, &quotes)?;
        if !quotes.is_empty() && summary.with_quotes == 0 {
            warn!("no quote rows matched any fixture");
        }
        info!(
            path = %path.display(),
            rows = summary.predictions,
            with_quotes = summary.with_quotes,
            "workbook exported"
        );
    }

    Ok(())
}
