// ── Raw-to-canonical normalization ──
//
// Bridges lenient `fieldsync_api` payload types into `crate::model`
// records. Every function here is total: malformed or missing members
// degrade to defaults, never to an error.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::warn;

use fieldsync_api::{RawAlert, RawReport, RawSensor, RawStats, ReportsPayload};

use crate::model::{
    Alert, AlertMeasure, AlertSeverity, EntityId, Report, ReportPeriod, Sensor, SensorStatus,
    Stats, UNKNOWN_ZONE,
};
use crate::stats::compute_stats;

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a timestamp sent as RFC 3339, a naive ISO-8601 string (taken as
/// UTC), or epoch milliseconds (number or numeric string).
fn parse_timestamp(raw: Option<&Value>) -> Option<DateTime<Utc>> {
    match raw? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(f64_to_millis))
            .and_then(DateTime::from_timestamp_millis),
        Value::String(s) => parse_timestamp_str(s),
        _ => None,
    }
}

fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis)
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn f64_to_millis(value: f64) -> i64 {
    value.trunc() as i64
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn f64_to_count(value: f64) -> usize {
    value.max(0.0).round() as usize
}

/// Settle on one identity from a primary field and its alias.
///
/// Returns `(canonical, alias)`; each falls back to the other. With
/// neither present, both get a generated placeholder.
fn identity(primary: Option<String>, alias: Option<String>, kind: &str) -> (EntityId, EntityId) {
    match (primary, alias) {
        (Some(id), Some(alias)) => (EntityId::from(id), EntityId::from(alias)),
        (Some(id), None) | (None, Some(id)) => {
            let id = EntityId::from(id);
            (id.clone(), id)
        }
        (None, None) => {
            let id = EntityId::generated();
            warn!(kind, %id, "payload carried no identity, generated one");
            (id.clone(), id)
        }
    }
}

fn measure(raw: Option<Value>) -> Option<AlertMeasure> {
    match raw? {
        Value::Number(n) => n.as_f64().map(AlertMeasure::Number),
        Value::String(s) if !s.trim().is_empty() => Some(match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => AlertMeasure::Number(n),
            _ => AlertMeasure::Text(s),
        }),
        _ => None,
    }
}

// ── Sensor ─────────────────────────────────────────────────────────

/// Normalize one sensor, stamping missing timestamps with "now".
pub fn normalize_sensor(raw: RawSensor) -> Sensor {
    normalize_sensor_at(raw, Utc::now())
}

/// Normalize a fetched collection with a single shared "now".
pub fn normalize_sensors(raw: Vec<RawSensor>) -> Vec<Sensor> {
    let now = Utc::now();
    raw.into_iter().map(|s| normalize_sensor_at(s, now)).collect()
}

/// Normalize one sensor against an explicit normalization instant.
pub fn normalize_sensor_at(raw: RawSensor, now: DateTime<Utc>) -> Sensor {
    let (id, sensor_id) = identity(raw.id, raw.sensor_id, "sensor");

    let temperature = raw.temperature.unwrap_or(0.0);
    let humidity = raw.humidity.unwrap_or(0.0);
    let soil_moisture = raw.soil_moisture.unwrap_or(0.0);

    let status = raw
        .status
        .as_deref()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(|| SensorStatus::from_readings(temperature, humidity, soil_moisture));

    let timestamp = parse_timestamp(raw.timestamp.as_ref())
        .or_else(|| parse_timestamp(raw.event_processed_utc_time.as_ref()))
        .unwrap_or(now);

    Sensor {
        id,
        sensor_id,
        name: raw.name,
        field_id: raw.field_id,
        crop_type: raw.crop_type,
        area_hectares: raw.area_hectares,
        location: raw.location.unwrap_or_else(|| UNKNOWN_ZONE.to_owned()),
        temperature,
        humidity,
        soil_moisture,
        ph_level: raw.ph_level.or(raw.ph),
        water_level: raw.water_level,
        light_intensity: raw.light_intensity,
        status,
        alerts: raw.alerts.unwrap_or_default(),
        timestamp,
    }
}

// ── Alert ──────────────────────────────────────────────────────────

pub fn normalize_alert(raw: RawAlert) -> Alert {
    normalize_alert_at(raw, Utc::now())
}

pub fn normalize_alerts(raw: Vec<RawAlert>) -> Vec<Alert> {
    let now = Utc::now();
    raw.into_iter().map(|a| normalize_alert_at(a, now)).collect()
}

fn normalize_alert_at(raw: RawAlert, now: DateTime<Utc>) -> Alert {
    let (id, _) = identity(raw.id, raw.alert_id, "alert");
    Alert {
        id,
        sensor_id: raw.sensor_id.map(EntityId::from),
        field_id: raw.field_id,
        alert_type: raw.kind.or(raw.alert_type),
        severity: AlertSeverity::from_raw(raw.severity.as_deref()),
        message: raw.message.unwrap_or_default(),
        value: measure(raw.value),
        threshold: measure(raw.threshold),
        timestamp: parse_timestamp(raw.timestamp.as_ref()).unwrap_or(now),
    }
}

// ── Reports ────────────────────────────────────────────────────────

/// Flatten the polymorphic `/reports` payload into a list of reports.
pub fn normalize_reports(payload: ReportsPayload) -> Vec<Report> {
    let now = Utc::now();
    match payload {
        ReportsPayload::List(reports) => reports
            .into_iter()
            .map(|r| normalize_report_at(r, now))
            .collect(),
        ReportsPayload::Single(report) => vec![normalize_report_at(report, now)],
        ReportsPayload::Table(text) => parse_report_table(&text, now),
        ReportsPayload::Empty => Vec::new(),
    }
}

fn normalize_report_at(raw: RawReport, now: DateTime<Utc>) -> Report {
    let sensors: Vec<Sensor> = raw
        .sensors
        .into_iter()
        .map(|s| normalize_sensor_at(s, now))
        .collect();
    // Reports without embedded figures fall back to what their sensors say.
    let stats = raw
        .stats
        .map_or_else(|| compute_stats(&sensors, &[]), convert_stats);
    let period = raw.period.unwrap_or_default();

    Report {
        generated_at: parse_timestamp(raw.generated_at.as_ref()).unwrap_or(now),
        period: ReportPeriod {
            start: parse_timestamp(period.start.as_ref()),
            end: parse_timestamp(period.end.as_ref()),
        },
        fields: report_fields(raw.fields),
        report_type: raw.report_type,
        stats,
        sensors,
        extra: BTreeMap::new(),
    }
}

fn convert_stats(raw: RawStats) -> Stats {
    Stats {
        total_sensors: raw.total_sensors.map_or(0, f64_to_count),
        active_alerts: raw.active_alerts.map_or(0, f64_to_count),
        avg_temperature: raw.avg_temperature.unwrap_or(0.0),
        avg_humidity: raw.avg_humidity.unwrap_or(0.0),
        avg_soil_moisture: raw.avg_soil_moisture.unwrap_or(0.0),
    }
}

/// Field ids arrive as an array or as one `;`/`|`-delimited string.
fn report_fields(raw: Option<Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => split_fields(&s),
        _ => Vec::new(),
    }
}

fn split_fields(raw: &str) -> Vec<String> {
    raw.split([';', '|', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

// ── Text-table reports ─────────────────────────────────────────────

/// Report members a table column can map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    GeneratedAt,
    PeriodStart,
    PeriodEnd,
    Fields,
    ReportType,
    TotalSensors,
    ActiveAlerts,
    AvgTemperature,
    AvgHumidity,
    AvgSoilMoisture,
    Other,
}

impl Column {
    /// Match a header case-insensitively, ignoring spaces, `_` and `-`.
    fn from_header(header: &str) -> Self {
        let key: String = header
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "generatedat" | "generated" | "date" => Self::GeneratedAt,
            "periodstart" | "start" => Self::PeriodStart,
            "periodend" | "end" => Self::PeriodEnd,
            "fields" | "field" | "fieldid" | "fieldids" | "zones" | "zone" => Self::Fields,
            "reporttype" | "type" => Self::ReportType,
            "totalsensors" => Self::TotalSensors,
            "activealerts" => Self::ActiveAlerts,
            "avgtemperature" | "averagetemperature" => Self::AvgTemperature,
            "avghumidity" | "averagehumidity" => Self::AvgHumidity,
            "avgsoilmoisture" | "averagesoilmoisture" => Self::AvgSoilMoisture,
            _ => Self::Other,
        }
    }
}

/// Split one table line on commas outside double quotes.
///
/// Quotes are dropped, `""` inside a quoted cell is a literal quote, and
/// every cell is trimmed.
fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);

    cells.into_iter().map(|c| c.trim().to_owned()).collect()
}

/// Parse a header line plus comma-separated rows into reports.
///
/// Empty cells are treated as absent. Columns with no dedicated report
/// member are kept in `extra` under their original header.
fn parse_report_table(text: &str, now: DateTime<Utc>) -> Vec<Report> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<(String, Column)> = split_row(header)
        .into_iter()
        .map(|h| {
            let column = Column::from_header(&h);
            (h, column)
        })
        .collect();

    lines
        .map(|line| {
            let mut report = Report {
                generated_at: now,
                period: ReportPeriod::default(),
                fields: Vec::new(),
                report_type: None,
                stats: Stats::default(),
                sensors: Vec::new(),
                extra: BTreeMap::new(),
            };
            for ((name, column), value) in headers.iter().zip(split_row(line)) {
                if value.is_empty() {
                    continue;
                }
                apply_cell(&mut report, *column, name, &value);
            }
            report
        })
        .collect()
}

fn apply_cell(report: &mut Report, column: Column, name: &str, value: &str) {
    let number = || value.parse::<f64>().ok().filter(|v| v.is_finite());
    match column {
        Column::GeneratedAt => {
            if let Some(ts) = parse_timestamp_str(value) {
                report.generated_at = ts;
            }
        }
        Column::PeriodStart => report.period.start = parse_timestamp_str(value),
        Column::PeriodEnd => report.period.end = parse_timestamp_str(value),
        Column::Fields => report.fields = split_fields(value),
        Column::ReportType => report.report_type = Some(value.to_owned()),
        Column::TotalSensors => report.stats.total_sensors = number().map_or(0, f64_to_count),
        Column::ActiveAlerts => report.stats.active_alerts = number().map_or(0, f64_to_count),
        Column::AvgTemperature => report.stats.avg_temperature = number().unwrap_or(0.0),
        Column::AvgHumidity => report.stats.avg_humidity = number().unwrap_or(0.0),
        Column::AvgSoilMoisture => report.stats.avg_soil_moisture = number().unwrap_or(0.0),
        Column::Other => {
            report.extra.insert(name.to_owned(), value.to_owned());
        }
    }
}
