// ── Sensor domain types ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::entity_id::EntityId;

/// Location label for sensors that report none.
pub const UNKNOWN_ZONE: &str = "unknown zone";

/// Health classification of a sensor's latest reading.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SensorStatus {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl SensorStatus {
    /// Classify readings when the service doesn't report a status.
    ///
    /// Critical above 35 °C, below 30 % humidity, or below 20 % soil
    /// moisture; warning above 30 °C, below 40 % humidity, or below 30 %
    /// soil moisture.
    pub fn from_readings(temperature: f64, humidity: f64, soil_moisture: f64) -> Self {
        if temperature > 35.0 || humidity < 30.0 || soil_moisture < 20.0 {
            Self::Critical
        } else if temperature > 30.0 || humidity < 40.0 || soil_moisture < 30.0 {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

/// A monitoring node and its latest reading.
///
/// Replaced wholesale on every successful fetch; never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: EntityId,
    /// Secondary identity. Equal to `id` when the service sent only one.
    pub sensor_id: EntityId,
    pub name: Option<String>,
    pub field_id: Option<String>,
    pub crop_type: Option<String>,
    pub area_hectares: Option<f64>,
    pub location: String,

    // Readings
    /// Degrees Celsius.
    pub temperature: f64,
    /// Percent relative humidity.
    pub humidity: f64,
    /// Percent volumetric soil moisture.
    pub soil_moisture: f64,
    pub ph_level: Option<f64>,
    pub water_level: Option<f64>,
    pub light_intensity: Option<f64>,

    pub status: SensorStatus,
    /// Per-metric alert labels, e.g. `temperature -> "high"`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alerts: BTreeMap<String, String>,
    /// Reading capture time.
    pub timestamp: DateTime<Utc>,
}

impl Sensor {
    /// Display label: the name when present, otherwise the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}
