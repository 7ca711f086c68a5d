// ── Report domain types ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sensor::Sensor;
use super::stats::Stats;

/// Time window a report covers. Either bound may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// A generated report: stats and sensors captured for a period and a
/// selection of fields. Write-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub period: ReportPeriod,
    /// Field/zone ids the report was generated for.
    pub fields: Vec<String>,
    pub report_type: Option<String>,
    pub stats: Stats,
    pub sensors: Vec<Sensor>,
    /// Columns of a text-table report with no dedicated field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}
