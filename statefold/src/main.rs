use anyhow::{Context, Result};
use clap::Parser;
use statefold::{Config, Ingestor};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Fold numbers read from stdin through named event pipelines",
    long_about = None
)]
struct Cli {
    /// TOML file describing pipelines and the ingestion route
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Pipeline that receives every input line (overrides the config)
    #[arg(long, short)]
    route: Option<String>,

    /// Emit log lines as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(route) = cli.route {
        config.route = route;
    }

    let registry = config.start_registry().context("starting pipelines")?;
    info!(pipelines = ?registry.names(), route = %config.route, "pipelines started");

    // Events accepted before a read failure are still drained.
    let outcome = Ingestor::new(&registry, config.route.as_str())
        .run(BufReader::new(tokio::io::stdin()))
        .await;
    match &outcome {
        Ok(report) => info!(
            accepted = report.accepted,
            rejected = report.rejected,
            unrouted = report.unrouted,
            "input exhausted; draining pipelines"
        ),
        Err(err) => error!(error = %err, "reading input failed; draining pipelines"),
    }

    for (name, drained) in registry.shutdown().await {
        match drained {
            Ok(state) => info!(pipeline = %name, state = %state, "pipeline drained"),
            Err(err) => warn!(pipeline = %name, error = %err, "pipeline did not drain cleanly"),
        }
    }

    outcome.context("reading stdin")?;
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
