// ── Store operations ──
//
// Every operation records its own failure into the snapshot's `error`
// field instead of returning it; callers inspect the snapshot. Each
// completed fetch lands in a single `send_modify`, so subscribers never
// see a collection without its matching stats and timestamps.

use std::sync::Arc;

use chrono::Utc;
use fieldsync_api::RemoteClient;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::snapshot::SyncSnapshot;
use crate::api::SensorApi;
use crate::config::SyncConfig;
use crate::error::CoreError;
use crate::lifecycle::ResolveOutcome;
use crate::model::{EntityId, Stats};
use crate::normalize;
use crate::stream::SnapshotStream;

/// Authoritative in-memory state for one monitoring deployment.
///
/// Cheaply cloneable via `Arc<StoreInner>`; clones share state. Overlapping
/// calls of the same operation are not serialized: results are applied on
/// arrival and the last one to land wins.
pub struct SyncStore<A: SensorApi = RemoteClient> {
    inner: Arc<StoreInner<A>>,
}

struct StoreInner<A> {
    api: A,
    state: watch::Sender<SyncSnapshot>,
}

impl<A: SensorApi> Clone for SyncStore<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SyncStore<RemoteClient> {
    /// Build a store backed by an HTTP client for `config.api_url`.
    pub fn from_config(config: &SyncConfig) -> Result<Self, CoreError> {
        let client = RemoteClient::new(config.api_url.as_str(), &config.transport())?;
        Ok(Self::new(client))
    }
}

impl<A: SensorApi> SyncStore<A> {
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(SyncSnapshot::default());
        Self {
            inner: Arc::new(StoreInner { api, state }),
        }
    }

    /// The service port this store fetches through.
    pub fn api(&self) -> &A {
        &self.inner.api
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SyncSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to whole-snapshot updates.
    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.inner.state.subscribe())
    }

    // ── Fetches ──────────────────────────────────────────────────────

    /// Replace the sensor collection and recompute stats.
    ///
    /// Shows as loading and clears any previous error first. On failure
    /// the previous sensors stay in place.
    pub async fn fetch_sensors(&self) {
        let _loading = LoadingGuard::begin(&self.inner.state, true);

        match self.inner.api.list_sensors().await {
            Ok(raw) => {
                let sensors = normalize::normalize_sensors(raw);
                debug!(count = sensors.len(), "sensors fetched");
                self.inner.state.send_modify(|s| {
                    s.sensors = Arc::new(sensors);
                    s.last_update = Some(Utc::now());
                    s.recompute_stats();
                });
            }
            Err(e) => self.record_error("sensors", e.into()),
        }
    }

    /// Replace the realtime collection. Never shows as loading.
    pub async fn fetch_realtime(&self) {
        match self.inner.api.list_realtime().await {
            Ok(raw) => {
                let readings = normalize::normalize_sensors(raw);
                debug!(count = readings.len(), "realtime readings fetched");
                self.inner.state.send_modify(|s| {
                    s.realtime = Arc::new(readings);
                    s.last_update = Some(Utc::now());
                });
            }
            Err(e) => self.record_error("realtime", e.into()),
        }
    }

    /// Replace the alert collection and refresh the active-alert count.
    ///
    /// Alerts resolved locally are dropped from the result for as long as
    /// the service keeps listing them. A tombstone is only retired by a
    /// fetch issued after its resolve that no longer lists the id, and only
    /// once no fetch issued before the resolve is still in flight.
    pub async fn fetch_alerts(&self) {
        let pending = AlertFetch::begin(&self.inner.state);
        let issued = pending.issued;

        match self.inner.api.list_alerts().await {
            Ok(raw) => {
                let fetched = normalize::normalize_alerts(raw);
                debug!(count = fetched.len(), issued, "alerts fetched");
                self.inner.state.send_modify(|s| {
                    let oldest = s
                        .alert_fetches
                        .keys()
                        .next()
                        .copied()
                        .unwrap_or(u64::MAX);
                    let resolved = Arc::make_mut(&mut s.resolved);
                    resolved.retain(|id, stamp| {
                        *stamp > issued
                            || oldest < *stamp
                            || fetched.iter().any(|a| a.id == *id)
                    });
                    let alerts: Vec<_> = fetched
                        .into_iter()
                        .filter(|a| !resolved.contains_key(&a.id))
                        .collect();
                    s.stats.active_alerts = alerts.len();
                    s.alerts = Arc::new(alerts);
                });
            }
            Err(e) => self.record_error("alerts", e.into()),
        }
    }

    /// Replace the report collection.
    pub async fn fetch_reports(&self) {
        match self.inner.api.list_reports().await {
            Ok(payload) => {
                let reports = normalize::normalize_reports(payload);
                debug!(count = reports.len(), "reports fetched");
                self.inner.state.send_modify(|s| s.reports = Arc::new(reports));
            }
            Err(e) => self.record_error("reports", e.into()),
        }
    }

    /// Fetch one sensor's detail into `selected_sensor`.
    ///
    /// A response without a sensor clears the selection; a failure keeps
    /// the previous one.
    pub async fn select_sensor(&self, id: &str) {
        let _loading = LoadingGuard::begin(&self.inner.state, false);

        match self.inner.api.get_sensor(id).await {
            Ok(Some(mut raw)) => {
                if raw.id.is_none() && raw.sensor_id.is_none() {
                    raw.id = Some(id.to_owned());
                }
                let sensor = normalize::normalize_sensor(raw);
                self.inner
                    .state
                    .send_modify(|s| s.selected_sensor = Some(Arc::new(sensor)));
            }
            Ok(None) => {
                debug!(id, "sensor detail was empty");
                self.inner.state.send_modify(|s| s.selected_sensor = None);
            }
            Err(e) => self.record_error("sensor detail", e.into()),
        }
    }

    /// Run all four fetches concurrently; loading clears once every one
    /// has settled, whatever their outcomes.
    pub async fn refresh_all(&self) {
        let _loading = LoadingGuard::begin(&self.inner.state, false);

        tokio::join!(
            self.fetch_sensors(),
            self.fetch_realtime(),
            self.fetch_alerts(),
            self.fetch_reports(),
        );
        debug!("full refresh settled");
    }

    // ── Alerts ───────────────────────────────────────────────────────

    /// Resolve an alert remotely, then remove it locally.
    ///
    /// Unknown ids are a no-op without a remote call. Nothing is removed
    /// before the service confirms. Confirmation gating lives in
    /// [`AlertLifecycle`](crate::lifecycle::AlertLifecycle).
    pub async fn resolve_alert(&self, id: &str) -> ResolveOutcome {
        let known = self.inner.state.borrow().alerts.iter().any(|a| a.id == id);
        if !known {
            debug!(id, "resolve requested for unknown alert");
            return ResolveOutcome::NotFound;
        }

        match self.inner.api.resolve_alert(id).await {
            Ok(()) => {
                let id = EntityId::from(id);
                self.inner.state.send_modify(|s| {
                    if let Some(pos) = s.alerts.iter().position(|a| a.id == id) {
                        Arc::make_mut(&mut s.alerts).remove(pos);
                        s.stats.active_alerts = s.stats.active_alerts.saturating_sub(1);
                    }
                    s.resolve_generation += 1;
                    let stamp = s.resolve_generation;
                    Arc::make_mut(&mut s.resolved).insert(id.clone(), stamp);
                });
                info!(%id, "alert resolved");
                ResolveOutcome::Resolved
            }
            Err(e) => {
                let err = CoreError::from(e);
                let message = err.to_string();
                self.record_error("resolve alert", err);
                ResolveOutcome::Failed { message }
            }
        }
    }

    // ── Derived state ────────────────────────────────────────────────

    /// Recompute stats from the current collections and store them.
    pub fn calculate_stats(&self) -> Stats {
        let mut stats = Stats::default();
        self.inner.state.send_modify(|s| {
            s.recompute_stats();
            stats = s.stats;
        });
        stats
    }

    // ── Flags ────────────────────────────────────────────────────────

    /// Clear the error message, leaving everything else untouched.
    pub fn clear_error(&self) {
        self.inner.state.send_modify(|s| s.error = None);
    }

    /// Return to the initial empty state.
    pub fn reset(&self) {
        self.inner.state.send_modify(|s| {
            let depth = s.loading_depth;
            let generation = s.resolve_generation;
            let alert_fetches = std::mem::take(&mut s.alert_fetches);
            *s = SyncSnapshot {
                loading_depth: depth,
                resolve_generation: generation,
                alert_fetches,
                ..SyncSnapshot::default()
            };
        });
    }

    fn record_error(&self, operation: &'static str, err: CoreError) {
        warn!(operation, error = %err, "store operation failed");
        let message = err.to_string();
        self.inner.state.send_modify(|s| s.error = Some(message));
    }
}

// ── Loading flag ─────────────────────────────────────────────────────

/// Holds the store in the loading state until dropped.
///
/// Loading is a counter, so overlapping operations clear it only when the
/// last one settles, including when its future is dropped mid-flight.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SyncSnapshot>,
}

impl<'a> LoadingGuard<'a> {
    fn begin(state: &'a watch::Sender<SyncSnapshot>, clear_error: bool) -> Self {
        state.send_modify(|s| {
            s.loading_depth += 1;
            if clear_error {
                s.error = None;
            }
        });
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .send_modify(|s| s.loading_depth = s.loading_depth.saturating_sub(1));
    }
}

// ── Alert fetch tracking ─────────────────────────────────────────────

/// Registers an in-flight alert fetch under the resolve generation it was
/// issued at, until dropped. Invisible to subscribers.
struct AlertFetch<'a> {
    state: &'a watch::Sender<SyncSnapshot>,
    issued: u64,
}

impl<'a> AlertFetch<'a> {
    fn begin(state: &'a watch::Sender<SyncSnapshot>) -> Self {
        let mut issued = 0;
        state.send_if_modified(|s| {
            issued = s.resolve_generation;
            *s.alert_fetches.entry(issued).or_default() += 1;
            false
        });
        Self { state, issued }
    }
}

impl Drop for AlertFetch<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            if let Some(count) = s.alert_fetches.get_mut(&self.issued) {
                *count -= 1;
                if *count == 0 {
                    s.alert_fetches.remove(&self.issued);
                }
            }
            false
        });
    }
}
