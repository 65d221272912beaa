//! moonwatch daemon
//!
//! Polls Moonraker-based 3D printer controllers, reconciles the results into
//! a tracked host list, and raises notifications on status changes. Exposes
//! an HTTP API and a WebSocket event stream.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use eyre::WrapErr;
use kameo::actor::Spawn;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use moonwatch_core::{MonitorActor, MonitorActorArgs, StartPolling};
use moonwatch_notify::{DesktopNotifier, LogNotifier, Notifier};
use moonwatch_probe::{HostProbe, MoonrakerProbe};

mod api;
mod config;
mod router;
mod state;
mod ws;

use config::{Config, NotifierKind};
use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "moonwatch", about = "Moonraker fleet monitor daemon")]
struct Cli {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the configuration file
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load_default()?,
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.daemon.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let notifier: Arc<dyn Notifier> = match config.monitor.notifier {
        NotifierKind::Desktop => Arc::new(DesktopNotifier::new()),
        NotifierKind::Log => Arc::new(LogNotifier::new()),
    };
    let probe: Arc<dyn HostProbe> = Arc::new(MoonrakerProbe::new()?);

    let (event_tx, _) = broadcast::channel(256);
    let monitor = MonitorActor::spawn(MonitorActorArgs {
        policy: config.policy(),
        probe,
        notifier,
        event_tx: event_tx.clone(),
        seeds: config.host.clone(),
    });

    if config.monitor.autostart {
        monitor
            .ask(StartPolling {
                interval: config.monitor.poll_interval(),
            })
            .await
            .map_err(|e| eyre::eyre!("failed to start polling: {e}"))?;
        info!(
            interval_seconds = config.monitor.poll_interval_seconds,
            hosts = config.host.len(),
            "polling started at boot"
        );
    }

    let bind = cli.bind.unwrap_or_else(|| config.daemon.bind.clone());
    let state = Arc::new(AppState::new(monitor, event_tx, config));
    let app = router::create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .wrap_err_with(|| format!("failed to bind {bind}"))?;
    info!(addr = %bind, "moonwatch daemon listening");
    axum::serve(listener, app).await?;

    Ok(())
}
