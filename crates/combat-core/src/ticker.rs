//! Background tick task.
//!
//! [`TickTask::start`] spawns a Tokio task that calls
//! [`CombatManager::on_tick`] once per interval. The manager sits behind a
//! [`tokio::sync::Mutex`] shared with whatever delivers host notifications,
//! so a tick never interleaves with a damage or death notification.
//!
//! Dropping the handle stops the task.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::manager::CombatManager;

/// Handle to a running tick task.
#[derive(Debug)]
pub struct TickTask {
    handle: JoinHandle<()>,
    ticks: Arc<AtomicU64>,
}

impl TickTask {
    /// Spawn the tick loop on the current Tokio runtime.
    ///
    /// The first tick fires one `interval` after start. Ticks missed while
    /// the manager was busy are delayed, not burst.
    pub fn start(manager: Arc<Mutex<CombatManager>>, interval: Duration) -> Self {
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);

        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            timer.tick().await;

            loop {
                timer.tick().await;
                let expired = manager.lock().await.on_tick();
                let tick = counter.fetch_add(1, Ordering::Relaxed);
                if expired > 0 {
                    debug!(tick, expired, "Combat entries expired");
                }
            }
        });

        info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "Combat tick task started"
        );
        Self { handle, ticks }
    }

    /// Number of ticks completed so far.
    pub fn ticks_run(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Whether the task is still running.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop the task. Returns the number of ticks it completed.
    pub async fn shutdown(mut self) -> u64 {
        self.handle.abort();
        // A cancellation error is the normal outcome of the abort.
        match (&mut self.handle).await {
            Err(err) if err.is_panic() => warn!(%err, "Combat tick task panicked"),
            Ok(()) | Err(_) => {}
        }
        let ticks = self.ticks_run();
        info!(ticks, "Combat tick task stopped");
        ticks
    }
}

impl Drop for TickTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
