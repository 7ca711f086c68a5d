// Raw response types
//
// Models for the monitoring service's JSON payloads. The service is loose
// about field names and types (identity under `id` or `sensorId`, numbers
// sent as strings, reports as arrays, objects, or text tables), so every
// field deserializes leniently: a value of the wrong shape becomes `None`
// instead of failing the whole record. `fieldsync-core` turns these into
// canonical domain types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Envelope ─────────────────────────────────────────────────────────

/// Extract the `data` member of a `{ data: ... }` envelope.
///
/// A missing `data` member (or a body that isn't an object) is an empty
/// result, represented as `Value::Null`.
pub fn envelope_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Interpret an envelope payload as a list. Anything other than an array is
/// an empty list.
pub(crate) fn into_list<T>(data: Value, item: impl Fn(Value) -> T) -> Vec<T> {
    match data {
        Value::Array(items) => items.into_iter().map(item).collect(),
        _ => Vec::new(),
    }
}

// ── Sensor ───────────────────────────────────────────────────────────

/// Sensor reading as sent by `/sensors`, `/sensors/{id}`, and `/realtime`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSensor {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub sensor_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub field_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub crop_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub area_hectares: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub soil_moisture: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub ph_level: Option<f64>,
    /// Short form of `phLevel` sent by some firmware. Kept as its own
    /// field so a payload carrying both keys still deserializes.
    #[serde(default, deserialize_with = "lenient::number")]
    pub ph: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub water_level: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub light_intensity: Option<f64>,

    /// `normal` / `warning` / `critical` when the service computes it.
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    /// RFC 3339 string or epoch milliseconds.
    #[serde(default)]
    pub timestamp: Option<Value>,
    /// Set by the upstream stream processor; fallback capture time.
    #[serde(default, rename = "EventProcessedUtcTime")]
    pub event_processed_utc_time: Option<Value>,
    /// Per-metric alert labels, e.g. `{ "temperature": "high" }`.
    #[serde(default, deserialize_with = "lenient::labels")]
    pub alerts: Option<BTreeMap<String, String>>,
}

impl RawSensor {
    /// Total conversion from an arbitrary JSON value.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

// ── Alert ────────────────────────────────────────────────────────────

/// Alert record from `/alerts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAlert {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub alert_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub sensor_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub field_id: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient::string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub alert_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub threshold: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl RawAlert {
    /// Total conversion from an arbitrary JSON value.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

// ── Report ───────────────────────────────────────────────────────────

/// Aggregate figures embedded in a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStats {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_sensors: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub active_alerts: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_soil_moisture: Option<f64>,
}

/// Report time window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPeriod {
    #[serde(default)]
    pub start: Option<Value>,
    #[serde(default)]
    pub end: Option<Value>,
}

/// Generated report from `/reports` (JSON form).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReport {
    #[serde(default)]
    pub generated_at: Option<Value>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub period: Option<RawPeriod>,
    /// Array of field/zone ids, or a single delimited string.
    #[serde(default)]
    pub fields: Option<Value>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub report_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub stats: Option<RawStats>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub sensors: Vec<RawSensor>,
}

impl RawReport {
    /// Total conversion from an arbitrary JSON value.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// The polymorphic `/reports` payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportsPayload {
    /// `data` is an array of report objects.
    List(Vec<RawReport>),
    /// `data` is a single report object.
    Single(RawReport),
    /// A delimited text table (header line + rows).
    Table(String),
    /// No usable payload.
    Empty,
}

impl ReportsPayload {
    /// Classify a `/reports` payload.
    pub fn from_data(data: Value) -> Self {
        match data {
            Value::Array(items) => Self::List(items.into_iter().map(RawReport::from_value).collect()),
            Value::Object(_) => Self::Single(RawReport::from_value(data)),
            Value::String(text) if !text.trim().is_empty() => Self::Table(text),
            _ => Self::Empty,
        }
    }
}

// ── Lenient field deserializers ──────────────────────────────────────

mod lenient {
    use std::collections::BTreeMap;

    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::RawSensor;

    /// Strings pass through (blank ones are dropped); numbers are rendered.
    pub(super) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Numbers pass through; numeric strings are parsed; non-finite values dropped.
    pub(super) fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let parsed = match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(parsed.filter(|v| v.is_finite()))
    }

    /// An object of scalar values, rendered as strings.
    pub(super) fn labels<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<BTreeMap<String, String>>, D::Error> {
        let Value::Object(map) = Value::deserialize(d)? else {
            return Ok(None);
        };
        let labels = map
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                Value::Number(n) => Some((k, n.to_string())),
                Value::Bool(b) => Some((k, b.to_string())),
                _ => None,
            })
            .collect();
        Ok(Some(labels))
    }

    /// A nested record, or `None` if it has the wrong shape.
    pub(super) fn nested<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(d)?;
        Ok(serde_json::from_value(value).ok())
    }

    /// An array of sensors; anything else is empty.
    pub(super) fn list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<RawSensor>, D::Error> {
        Ok(super::into_list(Value::deserialize(d)?, RawSensor::from_value))
    }
}
