use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::model::{Alert, AlertSeverity, EntityId, Report, Sensor, Stats};
use crate::stats::compute_stats;

/// Point-in-time view of everything the store holds.
///
/// Cheap to clone: collections sit behind `Arc`s and are swapped, never
/// edited, so a clone is a consistent read-only view. `error` and
/// `is_loading()` are independent; an error never clears loaded data.
#[derive(Debug, Clone, Default)]
pub struct SyncSnapshot {
    pub sensors: Arc<Vec<Sensor>>,
    /// Latest readings from the realtime feed, kept apart from `sensors`.
    pub realtime: Arc<Vec<Sensor>>,
    pub alerts: Arc<Vec<Alert>>,
    pub reports: Arc<Vec<Report>>,
    pub selected_sensor: Option<Arc<Sensor>>,
    pub stats: Stats,
    /// Message of the most recent failed operation.
    pub error: Option<String>,
    /// Time of the last successful sensor or realtime fetch.
    pub last_update: Option<DateTime<Utc>>,

    pub(super) loading_depth: usize,
    /// Alerts resolved locally that the service may still list, each
    /// stamped with the resolve generation that created it.
    pub(super) resolved: Arc<HashMap<EntityId, u64>>,
    /// Bumped by every successful resolve. Survives `reset`.
    pub(super) resolve_generation: u64,
    /// Alert fetches in flight, counted by the generation they were issued at.
    pub(super) alert_fetches: BTreeMap<u64, usize>,
}

impl SyncSnapshot {
    /// `true` while any loading operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading_depth > 0
    }

    pub fn sensor(&self, id: &str) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.id == id || s.sensor_id == id)
    }

    pub fn alert(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    pub fn alerts_by_severity(&self, severity: AlertSeverity) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(move |a| a.severity == severity)
    }

    pub(super) fn recompute_stats(&mut self) {
        self.stats = compute_stats(&self.sensors, &self.alerts);
    }
}
