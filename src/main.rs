use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod config;
mod gate;
mod handoff;
mod probe;
#[cfg(feature = "ui")]
mod screen;
mod state;

use config::AppConfig;
use gate::Gate;
use handoff::AppRegistry;
use probe::HttpProbe;
use state::SavedState;

/// Connectivity-gated launcher: waits until the endpoint answers with the
/// expected content, then hands off to the target application.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Application id to hand off to once the endpoint is reachable.
    #[arg(long)]
    app_id: Option<String>,

    /// Path to a TOML config overriding the embedded default.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    info!("Starting connectivity_gate");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load_default()?,
    };

    // Target app id: launch argument, then the value persisted by a
    // previously interrupted run, then empty.
    let saved = SavedState::restore(&config.state.path).await;
    let target_app_id = args.app_id.unwrap_or(saved.target_app_id);
    SavedState {
        target_app_id: target_app_id.clone(),
    }
    .store(&config.state.path)
    .await?;

    let probe = Arc::new(HttpProbe::new(&config.probe)?);
    let launcher = Arc::new(AppRegistry::new(config.handoff.apps.clone()));
    let retry_delay = Duration::from_millis(config.probe.retry_delay_ms);

    let handle = Gate::new(probe, launcher, target_app_id, retry_delay).spawn();

    // Log every transition; this is the whole presentation in headless runs.
    let mut status_rx = handle.state();
    tokio::spawn(async move {
        loop {
            info!("gate state: {:?}", *status_rx.borrow_and_update());
            if status_rx.changed().await.is_err() {
                break;
            }
        }
    });

    #[cfg(feature = "ui")]
    {
        // Blocks on the UI thread; the window closes once the gate is done
        // and tears the gate down if closed first.
        screen::run_screen(handle)?;
        info!("gate screen closed");
    }

    #[cfg(not(feature = "ui"))]
    {
        let mut handle = handle;
        tokio::select! {
            _ = handle.closed() => {
                info!("gate finished");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, tearing gate down");
                handle.teardown();
                handle.closed().await;
            }
        }
    }

    Ok(())
}
