// ── Periodic refresh of volatile data ──
//
// While active, every tick fetches realtime readings and alerts. Ticks run
// as independent tasks, so a slow tick never delays the next one and a
// stopped scheduler still lets in-flight ticks land in the store.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use fieldsync_api::RemoteClient;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use crate::api::SensorApi;
use crate::store::SyncStore;

/// Dashboard auto-refresh cadence.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(5);

/// Start/stop driver for realtime and alert polling.
///
/// Must be started from within a Tokio runtime.
pub struct PollingScheduler<A: SensorApi = RemoteClient> {
    store: SyncStore<A>,
    interval: Duration,
    tracker: TaskTracker,
    active: Mutex<Option<CancellationToken>>,
}

impl<A: SensorApi> PollingScheduler<A> {
    pub fn new(store: SyncStore<A>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            tracker: TaskTracker::new(),
            active: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.lock_active().is_some()
    }

    /// Start polling. The first tick fires one full interval from now.
    ///
    /// Returns `false` (and changes nothing) if already running.
    pub fn start(&self) -> bool {
        let mut active = self.lock_active();
        if active.is_some() {
            return false;
        }

        let cancel = CancellationToken::new();
        self.tracker.reopen();
        self.tracker.spawn(poll_loop(
            self.store.clone(),
            self.interval,
            cancel.clone(),
            self.tracker.clone(),
        ));
        *active = Some(cancel);
        info!(interval = ?self.interval, "polling started");
        true
    }

    /// Stop scheduling ticks. Ticks already in flight still complete and
    /// apply their results. Returns `false` if it wasn't running.
    pub fn stop(&self) -> bool {
        let Some(cancel) = self.lock_active().take() else {
            return false;
        };
        cancel.cancel();
        info!("polling stopped");
        true
    }

    /// Stop, then wait for every in-flight tick to finish.
    pub async fn shutdown(&self) {
        self.stop();
        self.tracker.close();
        self.tracker.wait().await;
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: SensorApi> Drop for PollingScheduler<A> {
    fn drop(&mut self) {
        if let Some(cancel) = self.lock_active().take() {
            cancel.cancel();
        }
    }
}

// ── Background task ──────────────────────────────────────────────────

async fn poll_loop<A: SensorApi>(
    store: SyncStore<A>,
    period: Duration,
    cancel: CancellationToken,
    tracker: TaskTracker,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let store = store.clone();
                tracker.spawn(async move {
                    tokio::join!(store.fetch_realtime(), store.fetch_alerts());
                });
            }
        }
    }
    debug!("polling loop exited");
}
