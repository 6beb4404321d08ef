//! Cryptodash - live terminal dashboard of ranked cryptocurrency prices
//!
//! Binary name: `cryptodash`

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::{
    fs::OpenOptions,
    io,
    path::Path,
    process,
    sync::{Arc, Mutex},
    time::Duration,
};

mod cli;
mod input;
mod launcher;
mod render;
mod source;
mod terminal;

use anyhow::{Context, Result};
use cli::Cli;
use cryptodash_core::{
    load_config, terminate_requested, DashboardEngine, DataSource, EngineHandle, EngineMessage,
    Error, KeyMap, RefreshScheduler, ShutdownCoordinator, ShutdownSignal, Theme,
};
use input::spawn_key_pump;
use launcher::SystemLauncher;
use source::TickerSource;
use terminal::TerminalScreen;
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Pending messages the engine channel holds before senders wait.
const CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("Error: {err:#}");
        }

        let code = err
            .downcast_ref::<Error>()
            .map_or(1, Error::exit_code);

        #[allow(clippy::exit)]
        process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref(), cli.overrides)
        .context("Failed to load configuration")?;
    init_tracing(config.log_file.as_deref())?;
    info!(
        limit = config.limit,
        refresh_secs = config.refresh_interval_secs,
        api_url = %config.api_url,
        global = config.global,
        "Starting cryptodash"
    );

    let keymap = KeyMap::standard().context("Invalid key bindings")?;
    let theme = Theme::from_name(&config.color);
    let source: Arc<dyn DataSource> = Arc::new(TickerSource::new(
        config.api_url.clone(),
        config.global_api_url.clone(),
    ));

    let (handle, rx) = EngineHandle::channel(CHANNEL_CAPACITY);
    let scheduler = RefreshScheduler::new(source, config.limit, handle.clone());

    // The first fetch runs before the terminal switches screens; a failure
    // shows up on the status line of the first frame.
    let initial = scheduler.refresh_now().await;
    let market = if config.global {
        Some(scheduler.market_now().await)
    } else {
        None
    };

    let screen = TerminalScreen::open()?;
    let mut engine = DashboardEngine::new(screen, SystemLauncher, keymap, theme, scheduler.clone())
        .context("Failed to initialise dashboard")?;
    engine.seed(initial);
    if let Some(market) = market {
        engine.seed_market(market);
    }

    let coordinator = ShutdownCoordinator::default();
    coordinator
        .register_task(scheduler.spawn_periodic(
            Duration::from_secs(config.refresh_interval_secs),
            coordinator.subscribe(),
        ))
        .await;
    coordinator
        .register_task(spawn_key_pump(handle.clone(), coordinator.flag()))
        .await;
    coordinator
        .register_task(forward_termination(handle, coordinator.subscribe()))
        .await;

    let outcome = engine.run(rx).await;
    coordinator.shutdown().await?;

    let reason = outcome.context("Dashboard stopped unexpectedly")?;
    info!(?reason, "Cryptodash exited");
    Ok(())
}

/// Send the engine a shutdown message when the process is told to terminate.
fn forward_termination(
    engine: EngineHandle,
    mut shutdown: broadcast::Receiver<ShutdownSignal>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown.recv() => {}
            result = terminate_requested() => match result {
                Ok(()) => {
                    let _ = engine.send(EngineMessage::Shutdown).await;
                }
                Err(e) => warn!(error = %e, "Termination signals unavailable"),
            },
        }
    })
}

/// Install the tracing subscriber.
///
/// The terminal belongs to the dashboard, so output goes to `log_file` or
/// nowhere. `RUST_LOG` overrides the default `info` level.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    Error::io_error(format!("Failed to open log file {}: {e}", path.display()))
                })?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::sink).init(),
    }
    Ok(())
}
