use std::path::PathBuf;

use clap::Parser;
use portsim::{App, init_logging, load_config};

#[derive(Parser, Debug)]
#[command(name = "portsim")]
#[command(about = "Simulate and compare rebalanced investment portfolios")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = portsim::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory for exported files and the log (overrides the configuration)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Seed of the random generator (overrides the configuration)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Portfolio CSV files (override the configuration)
    portfolios: Vec<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let loaded = load_config(&args.config);
    let mut config = loaded.config;
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if !args.portfolios.is_empty() {
        config.portfolios = args.portfolios;
    }

    init_logging(&config.output_dir, &args.log_level)?;
    for error in &loaded.errors {
        tracing::warn!("configuration {error}; using default");
    }

    let app = App::new(config);
    let summary = app.run(&mut std::io::stdout().lock())?;

    tracing::info!(
        simulated = summary.simulated(),
        failed = summary.failed(),
        "Application shutting down"
    );
    Ok(())
}
