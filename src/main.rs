use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use hazard_watch::render::{NoDisplay, Renderer};
use hazard_watch::{HazardWatchConfig, PeriodicTask, Pipeline, SystemClock, logging};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "HAZARDWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Do not open the scatter map in a browser
    #[arg(long)]
    no_display: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        HazardWatchConfig::load_from_path(cli.config).context("Failed to load configuration")?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging);

    info!("Starting HazardWatch {}", hazard_watch::VERSION);
    info!(
        "Event feed: {} (status={}), map output: {}",
        config.feed.url,
        config.feed.status,
        config.output.map_file.display()
    );

    let built = if cli.no_display {
        let renderer = Renderer::new(config.output.map_file.clone(), Box::new(NoDisplay));
        Pipeline::with_renderer(&config, renderer)
    } else {
        Pipeline::from_config(&config)
    };
    let mut pipeline = built.inspect_err(|e| error!("{}", e.user_message()))?;

    if cli.once {
        let report = pipeline.run_cycle().await;
        info!("Cycle finished: {:?}", report.outcome);
        return Ok(());
    }

    let mut task = PeriodicTask::new(
        SystemClock,
        config.schedule.refresh_interval(),
        config.schedule.tick(),
    );
    info!(
        "Refreshing every {} minutes - press Ctrl+C to stop",
        config.schedule.refresh_minutes
    );

    tokio::select! {
        _ = task.run_forever(&mut pipeline) => {}
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("HazardWatch stopped after {} cycles", task.runs());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
