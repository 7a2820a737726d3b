//! Screener - batch Nifty 50 stock screener
//!
//! 1. Loads the strategy config (YAML file, then `SCREENER__` env overrides)
//! 2. Reads a market snapshot from disk
//! 3. Runs the selected mode (screening, overview or news)
//! 4. Prints the report and optionally writes it as JSON

use anyhow::Context;
use clap::Parser;
use screener_runner::{config, load_snapshot, Cli, ScreenerRunner};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load(&cli.config)?;

    if cli.print_config {
        print!("{}", config::to_yaml(&config)?);
        return Ok(());
    }

    info!("Starting screener in {:?} mode", cli.mode);

    let snapshot = load_snapshot(&cli.snapshot).await?;
    let runner = ScreenerRunner::new(config);
    let outcome = runner.execute(cli.mode, &snapshot, cli.top, cli.symbol.as_deref())?;

    println!("{}", outcome.render());

    if let Some(path) = &cli.output {
        outcome
            .write_json(path)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Results saved to {}", path.display());
    }

    Ok(())
}
