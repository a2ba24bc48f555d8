//! Verdant daemon - plant-care report service.
//!
//! Serves current sensor telemetry and generates natural-language care
//! reports through an external generative-text API.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use verdantd::config::{Config, CONFIG_PATH};
use verdantd::gateway::{HttpGenerationTransport, ReportGateway};
use verdantd::server::{self, AppState};
use verdantd::store::TelemetryReader;

#[derive(Parser)]
#[command(name = "verdantd", about = "Plant-care report daemon")]
struct Args {
    /// Config file path
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// Override the listening port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config);
    let port = args.port.unwrap_or(config.server.port);

    info!("verdantd v{} starting", env!("CARGO_PKG_VERSION"));

    let reader = TelemetryReader::new(
        config.store.endpoint.clone(),
        Duration::from_secs(config.store.timeout_secs),
    )?;

    let transport = HttpGenerationTransport::new(
        config.llm.endpoint.clone(),
        config.llm.model.clone(),
        config.llm.api_key.clone(),
        config.llm.max_output_tokens,
        Duration::from_secs(config.llm.request_timeout_secs),
    )?;
    let gateway = ReportGateway::new(transport, config.retry.to_policy());

    let state = AppState::new(reader, gateway, PathBuf::from(&config.server.reports_dir));
    server::run(state, port).await
}
