//! Refresh Loop
//!
//! Background task for the periodic silent refresh. Started once at mount,
//! stopped at unmount; dropping the handle aborts the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::controller::RefreshController;

pub struct RefreshLoop {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshLoop {
    /// Spawn the loop. The first tick fires one `period` from now, since the
    /// mount already did a foreground refresh.
    pub fn start(controller: Arc<RefreshController>, period: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        log::info!("Starting refresh loop (every {}s)", period.as_secs());

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let outcome = controller.refresh(true).await;
                        controller.refresh_summary().await;
                        log::debug!("Background refresh: {:?}", outcome);
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            log::info!("Refresh loop stopped");
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the loop and wait for the in-flight tick (if any) to finish
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                log::warn!("Refresh loop ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for RefreshLoop {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
