use crate::handoff::Launcher;
use crate::probe::{Probe, ProbeResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Presentation-facing status of the gate screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Checking,
    Failed,
    Succeeded,
}

/// Connectivity gate: probes the endpoint until it answers with the
/// expected content, then hands off to the target application and closes.
/// Failures of any kind retry on a fixed delay, forever.
pub struct Gate {
    probe: Arc<dyn Probe>,
    launcher: Arc<dyn Launcher>,
    target_app_id: String,
    retry_delay: Duration,
}

/// Handle held by the hosting screen. Dropping it tears the gate down, so
/// abnormal exits cancel the retry timer and any in-flight probe too.
pub struct GateHandle {
    state_rx: watch::Receiver<GateState>,
    shutdown_tx: watch::Sender<bool>,
    driver: JoinHandle<()>,
}

impl Gate {
    pub fn new(
        probe: Arc<dyn Probe>,
        launcher: Arc<dyn Launcher>,
        target_app_id: String,
        retry_delay: Duration,
    ) -> Self {
        Gate {
            probe,
            launcher,
            target_app_id,
            retry_delay,
        }
    }

    /// Starts the gate driver task and returns the screen-side handle.
    pub fn spawn(self) -> GateHandle {
        let (state_tx, state_rx) = watch::channel(GateState::Checking);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let driver = tokio::spawn(self.run(state_tx, shutdown_rx));
        GateHandle {
            state_rx,
            shutdown_tx,
            driver,
        }
    }

    /// Driver loop. Sole owner of the gate state: every transition happens
    /// here, so at most one probe is ever in flight and a completion is
    /// always consumed before the next probe starts.
    async fn run(self, state_tx: watch::Sender<GateState>, mut shutdown_rx: watch::Receiver<bool>) {
        loop {
            if *shutdown_rx.borrow() {
                return;
            }
            let _ = state_tx.send(GateState::Checking);

            // Network I/O happens on its own task; the driver only waits.
            let mut probe_task = tokio::spawn(self.probe.check());
            let result = tokio::select! {
                res = &mut probe_task => match res {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::error!("probe task failed: {:#}", e);
                        ProbeResult::TransportError(e.to_string())
                    }
                },
                _ = torn_down(&mut shutdown_rx) => {
                    probe_task.abort();
                    return;
                }
            };

            // Stale completion after teardown must not mutate anything.
            if *shutdown_rx.borrow() {
                return;
            }

            match result {
                ProbeResult::Success => {
                    let _ = state_tx.send(GateState::Succeeded);
                    self.hand_off();
                    return;
                }
                other => {
                    tracing::warn!(
                        "probe failed: {:?}, retrying in {:?}",
                        other,
                        self.retry_delay
                    );
                    let _ = state_tx.send(GateState::Failed);
                    tokio::select! {
                        _ = sleep(self.retry_delay) => {}
                        _ = torn_down(&mut shutdown_rx) => return,
                    }
                }
            }
        }
    }

    /// Missing target apps are not an error: the screen just closes.
    fn hand_off(&self) {
        match self.launcher.resolve(&self.target_app_id) {
            Some(entry) => {
                tracing::info!("handing off to {}", self.target_app_id);
                if let Err(e) = self.launcher.launch(&entry) {
                    tracing::error!("hand-off to {} failed: {:#}", self.target_app_id, e);
                }
            }
            None => {
                tracing::info!(
                    "no launch entry for {:?}, closing without hand-off",
                    self.target_app_id
                );
            }
        }
    }
}

/// Resolves once teardown is requested. A dropped handle counts as torn
/// down as well.
async fn torn_down(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

impl GateHandle {
    /// Receiver for presentation updates.
    pub fn state(&self) -> watch::Receiver<GateState> {
        self.state_rx.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.driver.is_finished()
    }

    /// Idempotent. After this returns, no further state or presentation
    /// update is published, regardless of pending probes or timers.
    pub fn teardown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Waits for the driver task to exit.
    pub async fn closed(&mut self) {
        let _ = (&mut self.driver).await;
    }
}

impl Drop for GateHandle {
    fn drop(&mut self) {
        self.teardown();
        self.driver.abort();
    }
}
