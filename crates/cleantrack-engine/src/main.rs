//! Engine binary for the CleanTrack simulation.
//!
//! Wires together configuration, the seed world, the simulator, and the
//! live API server, then ticks until Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `cleantrack-config.yaml` (defaults if absent)
//!    and apply environment overrides
//! 2. Initialize structured logging (tracing) and report any rejected
//!    overrides
//! 3. Create the seed world and the simulator
//! 4. Spawn the live API server
//! 5. Run the tick loop until Ctrl-C
//! 6. Close subscriber queues and wait for the server to stop

mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use cleantrack_core::broadcast::Broadcaster;
use cleantrack_core::config::{CleanTrackConfig, LogFormat, LoggingConfig};
use cleantrack_core::{LiveWorld, Simulator, runner, seed};
use cleantrack_server::{AppState, ServerConfig};
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Path of the optional configuration file, relative to the working
/// directory.
const CONFIG_PATH: &str = "cleantrack-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, logging, or server startup fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration (before logging so the level can come from it).
    let (mut config, from_file) = load_config()?;
    let rejected = config.apply_env_overrides();

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!("cleantrack-engine starting");
    for r in &rejected {
        warn!(key = r.key, value = %r.value, error = %r.reason, "ignoring invalid environment override");
    }
    info!(
        from_file,
        host = %config.server.host,
        port = config.server.port,
        tick_interval_ms = config.simulation.tick_interval_ms,
        seed = config.simulation.seed,
        "Configuration loaded"
    );

    // 3. Seed world and simulator.
    let world = seed::create_seed_world(config.rules);
    let stats = world.stats();
    info!(
        bins = stats.total_bins,
        trucks = stats.active_trucks,
        hotspots = stats.total_hotspots,
        eco_points = stats.eco_points,
        "Seed world created"
    );
    let live = Arc::new(LiveWorld::new(world, Broadcaster::default()));
    let mut simulator = Simulator::from_config(config.simulation.clone())?;

    // 4. Live API server.
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let app_state = Arc::new(AppState::new(Arc::clone(&live)));
    let server_handle = cleantrack_server::spawn_server(
        ServerConfig::from(config.server.clone()),
        app_state,
        async move {
            // A dropped sender also counts as shutdown.
            let _ = shutdown_rx.await;
        },
    )?;

    // 5. Tick until Ctrl-C.
    let interval = Duration::from_millis(config.simulation.tick_interval_ms);
    tokio::select! {
        result = runner::run_simulation(&live, &mut simulator, interval, None) => {
            info!(total_ticks = result.total_ticks, "tick loop ended");
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Ctrl-C received, shutting down");
        }
    }

    // 6. Shutdown.
    live.shutdown().await;
    let _ = shutdown_tx.send(());
    if let Err(e) = server_handle.await {
        warn!(error = %e, "server task did not finish cleanly");
    }

    info!("cleantrack-engine shutdown complete");
    Ok(())
}

/// Load configuration from [`CONFIG_PATH`], falling back to defaults. The
/// flag reports whether the file was used.
fn load_config() -> Result<(CleanTrackConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((CleanTrackConfig::from_file(config_path)?, true))
    } else {
        let config = CleanTrackConfig::default();
        config.validate()?;
        Ok((config, false))
    }
}

/// Install the global tracing subscriber. `RUST_LOG` takes precedence
/// over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    result.map_err(|e| EngineError::Logging {
        message: e.to_string(),
    })
}
