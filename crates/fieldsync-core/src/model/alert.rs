// ── Alert domain types ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::entity_id::EntityId;

/// Closed severity classification. Anything unrecognised is `Info`.
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
pub enum AlertSeverity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    /// Total parse: missing, blank, or unknown severities become `Info`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse().ok()).unwrap_or_default()
    }
}

/// A reading or threshold attached to an alert. The service sends either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlertMeasure {
    Number(f64),
    Text(String),
}

impl fmt::Display for AlertMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A condition flagging a sensor reading outside expected bounds.
///
/// Created by a fetch; removed only by a successful resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: EntityId,
    pub sensor_id: Option<EntityId>,
    pub field_id: Option<String>,
    /// Category, e.g. `temperature` or `soilMoisture`.
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
    pub severity: AlertSeverity,
    pub message: String,
    pub value: Option<AlertMeasure>,
    pub threshold: Option<AlertMeasure>,
    pub timestamp: DateTime<Utc>,
}
