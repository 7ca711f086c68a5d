// ── Aggregate statistics ──
//
// Pure derivation of `Stats` from the sensor and alert collections.
// The store persists the result; nothing here has side effects.

use crate::model::{Alert, Sensor, Stats};

/// Compute aggregate stats.
///
/// Averages are arithmetic means rounded to one decimal place, or `0.0`
/// when there are no sensors. `active_alerts` is always `alerts.len()`,
/// independent of whether any sensors are loaded.
pub fn compute_stats(sensors: &[Sensor], alerts: &[Alert]) -> Stats {
    Stats {
        total_sensors: sensors.len(),
        active_alerts: alerts.len(),
        avg_temperature: mean(sensors.iter().map(|s| s.temperature)),
        avg_humidity: mean(sensors.iter().map(|s| s.humidity)),
        avg_soil_moisture: mean(sensors.iter().map(|s| s.soil_moisture)),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0.0), |(sum, count), v| (sum + v, count + 1.0));
    if count < 1.0 {
        return 0.0;
    }
    round1(sum / count)
}

/// Round half away from zero to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
