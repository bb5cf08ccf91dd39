//! Cursor-Wrap entry point.
//!
//! Wires together the infrastructure services and starts the Tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load config            -- --config PATH or the platform config dir
//!  └─ UpdateMonitorInfo      -- initial topology
//!  └─ start services
//!       ├─ mouse hook        (Win32 message-loop thread, owns WrapEngine)
//!       ├─ display watcher   (Tokio task, re-enumerates monitors)
//!       └─ settings watcher  (Tokio task, re-reads the config file)
//! ```

use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use wrap_core::TopologyStore;

use wrap_daemon::application::diagnose::build_report;
use wrap_daemon::application::refresh_topology::{MonitorEnumerator, UpdateMonitorInfo};
use wrap_daemon::application::state::SharedWrapState;
use wrap_daemon::infrastructure::input_capture::start_native_hook;
use wrap_daemon::infrastructure::screen_info::{native_enumerator, StaticMonitorEnumerator};
use wrap_daemon::infrastructure::storage::config::{
    config_file_path, load_config, save_config, AppConfig,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Wraps the mouse cursor around the outer edges of a multi-monitor desktop.
#[derive(Debug, Parser)]
#[command(
    name = "cursor-wrap",
    about = "Wrap the cursor from one outer edge of the desktop to the opposite one",
    version
)]
struct Cli {
    /// Path to the TOML config file.
    ///
    /// Defaults to `config.toml` in the platform config directory.
    #[arg(long, env = "CURSOR_WRAP_CONFIG")]
    config: Option<PathBuf>,

    /// Print the detected monitor topology as JSON and exit.
    #[arg(long)]
    diagnose: bool,

    /// Write a default config file (if none exists) and exit.
    #[arg(long, conflicts_with = "diagnose")]
    init_config: bool,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `RUST_LOG` wins; otherwise the configured level.
fn init_logging(config_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Pinned `[[monitors]]` take precedence over OS enumeration.
fn build_enumerator(config: &AppConfig) -> anyhow::Result<Box<dyn MonitorEnumerator>> {
    match config.static_monitors()? {
        Some(monitors) => {
            info!(count = monitors.len(), "using monitor layout from config");
            Ok(Box::new(StaticMonitorEnumerator::new(monitors)))
        }
        None => Ok(native_enumerator()?),
    }
}

fn init_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        println!("config already exists at {}", path.display());
        return Ok(());
    }
    save_config(path, &AppConfig::default())?;
    println!("wrote default config to {}", path.display());
    Ok(())
}

fn spawn_display_watcher(
    mut refresh: UpdateMonitorInfo,
    period: Duration,
    running: Arc<AtomicBool>,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        while running.load(Ordering::Relaxed) {
            ticker.tick().await;
            match refresh.refresh() {
                Ok(outcome) => debug!(?outcome, "display poll"),
                Err(e) => warn!("monitor enumeration failed, keeping previous topology: {e}"),
            }
        }
    });
}

fn spawn_settings_watcher(
    path: PathBuf,
    state: Arc<SharedWrapState>,
    period: Duration,
    running: Arc<AtomicBool>,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        while running.load(Ordering::Relaxed) {
            ticker.tick().await;
            match load_config(&path) {
                Ok(cfg) => {
                    state.apply_settings(cfg.wrap);
                    state.set_enabled(cfg.general.enabled);
                }
                Err(e) => warn!("config reload failed, keeping current settings: {e}"),
            }
        }
    });
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = config_file_path(cli.config.as_deref())?;
    let config = load_config(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    init_logging(&config.general.log_level);

    if cli.init_config {
        return init_config(&config_path);
    }

    let enumerator = build_enumerator(&config)?;

    if cli.diagnose {
        let report = build_report(enumerator.as_ref())?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    info!(config = %config_path.display(), "Cursor-Wrap starting");

    // ── Shared state and initial topology ─────────────────────────────────────
    let store = Arc::new(TopologyStore::default());
    let state = Arc::new(SharedWrapState::new(
        Arc::clone(&store),
        config.wrap,
        config.general.enabled,
    ));

    let mut refresh = UpdateMonitorInfo::new(enumerator, Arc::clone(&store));
    if let Err(e) = refresh.refresh() {
        warn!("initial monitor enumeration failed; wrapping stays inert until it succeeds: {e}");
    }

    // Shutdown flag shared across all background services.
    let running = Arc::new(AtomicBool::new(true));

    // ── Mouse hook ────────────────────────────────────────────────────────────
    let hook = match start_native_hook(Arc::clone(&state), tokio::runtime::Handle::current()) {
        Ok(hook) => hook,
        Err(e) => {
            error!("failed to start mouse hook: {e}");
            return Err(e.into());
        }
    };

    // ── Background watchers ───────────────────────────────────────────────────
    spawn_display_watcher(
        refresh,
        Duration::from_millis(config.general.display_poll_interval_ms.max(100)),
        Arc::clone(&running),
    );
    spawn_settings_watcher(
        config_path,
        Arc::clone(&state),
        Duration::from_millis(config.general.settings_poll_interval_ms.max(100)),
        Arc::clone(&running),
    );

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl-C: {e}"),
        }
    });

    info!("Cursor-Wrap ready.  Press Ctrl-C to exit.");

    while running.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    drop(hook);
    info!("Cursor-Wrap stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
