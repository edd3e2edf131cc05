use crate::store::DashboardStore;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// Disposal handle for a running updater task
///
/// Dropping the handle stops the task.
pub struct UpdaterHandle {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl UpdaterHandle {
    /// Cancel the task; takes effect before the next tick
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.task.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for UpdaterHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawn the periodic telemetry updater for `store`
///
/// The task holds a weak reference so it never keeps a discarded store alive.
pub fn spawn_updater(store: Arc<DashboardStore>, period: Duration) -> UpdaterHandle {
    let cancelled = Arc::new(AtomicBool::new(false));
    let task = tokio::spawn(run_updater(
        Arc::downgrade(&store),
        period,
        Arc::clone(&cancelled),
    ));

    UpdaterHandle { cancelled, task }
}

async fn run_updater(store: Weak<DashboardStore>, period: Duration, cancelled: Arc<AtomicBool>) {
    let mut ticker = interval(period);

    // Skip missed ticks to prevent backlog under load
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // The first tick completes immediately; readings move one period after start
    ticker.tick().await;

    loop {
        ticker.tick().await;

        if cancelled.load(Ordering::SeqCst) {
            break;
        }

        let Some(store) = store.upgrade() else {
            debug!("Store dropped, updater exiting");
            break;
        };

        store.tick_unless_cancelled(Utc::now(), &cancelled);
    }
}
