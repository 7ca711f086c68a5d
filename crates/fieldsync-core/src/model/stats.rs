use serde::{Deserialize, Serialize};

/// Aggregate figures derived from the sensor and alert collections.
///
/// Produced only by [`compute_stats`](crate::stats::compute_stats) (or the
/// active-alert fast path in the store); never edited independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_sensors: usize,
    pub active_alerts: usize,
    pub avg_temperature: f64,
    pub avg_humidity: f64,
    pub avg_soil_moisture: f64,
}
