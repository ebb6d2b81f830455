//! RiskSignal Timeline - security drift dashboard for the terminal

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use risksignal_app::cli::{self, Cli};
use risksignal_app::config::load_config;
use risksignal_app::logging;
use risksignal_app::view::terminal::Renderer;
use risksignal_client::DriftClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Config loads before the subscriber exists; its log lines are dropped.
    let config = load_config(args.config.as_deref());
    let (log_file, _log_guard) = logging::init(config.log_dir.as_deref(), args.verbose);
    info!("Starting RiskSignal - logging to {}", log_file.display());

    let base_url = args.base_url.clone().unwrap_or_else(|| config.base_url.clone());
    info!(%base_url, "Drift Engine");
    let api = Arc::new(DriftClient::new(base_url));
    let renderer = Renderer::new(cli::use_color(&config, args.no_color));

    cli::run(args.command, api, &config, &renderer).await
}
