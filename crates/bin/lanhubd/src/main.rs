//! # lanhubd: lanhub daemon
//!
//! Composition root that wires all adapters together and either serves the
//! HTTP API or runs a one-shot discovery sweep.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Initialise logging from the configured filter
//! - Open the JSON device store and load the registry
//! - Register every protocol adapter in the adapter directory
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lanhub_adapter_adb::AdbAdapter;
use lanhub_adapter_http_axum::state::AppState;
use lanhub_adapter_storage_json::JsonFileStore;
use lanhub_adapter_upnp::UpnpAdapter;
use lanhub_app::ports::DeviceStore;
use lanhub_app::services::adapter_directory::AdapterDirectory;
use lanhub_app::services::device_registry::DeviceRegistry;
use lanhub_app::services::discovery_sweep::DiscoverySweep;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "lanhubd", version, about = "Control LAN devices through one HTTP API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,
    /// Run one discovery sweep, print a summary and exit.
    Discover,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Registry
    let devices_file = config.devices_file();
    tracing::info!(path = %devices_file.display(), "opening device store");
    let store: Arc<dyn DeviceStore> = Arc::new(JsonFileStore::new(devices_file));
    let registry = Arc::new(DeviceRegistry::open(store).await);

    // Adapters
    let directory = Arc::new(
        AdapterDirectory::builder()
            .register(AdbAdapter::new(config.adb.clone()))
            .register(UpnpAdapter::new(config.upnp.clone())?)
            .build(),
    );
    tracing::info!(
        devices = registry.len(),
        adapters = ?directory.types(),
        "lanhub initialised"
    );

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, registry, directory).await,
        Command::Discover => {
            discover(registry, directory).await;
            Ok(())
        }
    }
}

async fn serve(
    config: &Config,
    registry: Arc<DeviceRegistry>,
    directory: Arc<AdapterDirectory>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(registry, directory);
    let app = lanhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("lanhubd listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("lanhubd stopped");
    Ok(())
}

async fn discover(registry: Arc<DeviceRegistry>, directory: Arc<AdapterDirectory>) {
    let report = DiscoverySweep::new(Arc::clone(&registry), directory)
        .run()
        .await;

    for outcome in &report.outcomes {
        println!("{outcome}");
    }
    println!(
        "{} device(s) discovered, {} known in total",
        report.found(),
        registry.len()
    );
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
