// In-memory `SensorApi` fake shared by the store, scheduler, and lifecycle tests.
#![allow(clippy::unwrap_used, dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{Value, json};

use fieldsync_api::{Error, RawAlert, RawSensor, ReportsPayload};
use fieldsync_core::SensorApi;

pub const SENSORS: &str = "sensors";
pub const DETAIL: &str = "detail";
pub const REALTIME: &str = "realtime";
pub const ALERTS: &str = "alerts";
pub const REPORTS: &str = "reports";
pub const RESOLVE: &str = "resolve";

/// Serves canned JSON, counts calls per endpoint, and can be told to fail
/// or to stall any endpoint.
#[derive(Default)]
pub struct FakeApi {
    sensors: Mutex<Value>,
    realtime: Mutex<Value>,
    alerts: Mutex<Value>,
    reports: Mutex<Value>,
    details: Mutex<HashMap<String, Value>>,
    failing: Mutex<HashSet<&'static str>>,
    delays: Mutex<HashMap<&'static str, Duration>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    resolved: Mutex<Vec<String>>,
    scripted_alerts: Mutex<VecDeque<(Duration, Value)>>,
}

impl FakeApi {
    /// Two sensors, two alerts, one report.
    pub fn seeded() -> Self {
        let api = Self::default();
        api.set_sensors(json!([
            { "sensorId": "A1", "temperature": 20, "humidity": 60, "soilMoisture": 40 },
            { "id": "A2", "temperature": 30, "humidity": 50, "soilMoisture": 35, "location": "North" }
        ]));
        api.set_realtime(json!([{ "sensorId": "A1", "temperature": 21.5 }]));
        api.set_alerts(json!([
            { "id": "al-1", "sensorId": "A1", "severity": "critical", "message": "Too hot" },
            { "id": "al-2", "sensorId": "A2", "severity": "warning", "message": "Dry soil" }
        ]));
        api.set_reports(json!([{ "reportType": "daily", "fields": ["F1"] }]));
        api
    }

    pub fn set_sensors(&self, value: Value) {
        *self.sensors.lock().unwrap() = value;
    }

    pub fn set_realtime(&self, value: Value) {
        *self.realtime.lock().unwrap() = value;
    }

    pub fn set_alerts(&self, value: Value) {
        *self.alerts.lock().unwrap() = value;
    }

    pub fn set_reports(&self, value: Value) {
        *self.reports.lock().unwrap() = value;
    }

    pub fn set_detail(&self, id: &str, value: Value) {
        self.details.lock().unwrap().insert(id.to_owned(), value);
    }

    pub fn fail(&self, endpoint: &'static str) {
        self.failing.lock().unwrap().insert(endpoint);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.failing.lock().unwrap().remove(endpoint);
    }

    pub fn delay(&self, endpoint: &'static str, by: Duration) {
        self.delays.lock().unwrap().insert(endpoint, by);
    }

    /// Answer an upcoming `list_alerts` call with `value` after
    /// `after`. Scripted answers are handed out in call order, then the
    /// fake falls back to whatever `set_alerts` holds.
    pub fn script_alerts(&self, after: Duration, value: Value) {
        self.scripted_alerts.lock().unwrap().push_back((after, value));
    }

    pub fn calls(&self, endpoint: &'static str) -> usize {
        self.calls.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    pub fn resolved_ids(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }

    async fn enter(&self, endpoint: &'static str) -> Result<(), Error> {
        *self.calls.lock().unwrap().entry(endpoint).or_default() += 1;
        let delay = self.delays.lock().unwrap().get(endpoint).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failing = self.failing.lock().unwrap().contains(endpoint);
        if failing {
            return Err(Error::Http {
                status: 503,
                message: format!("{endpoint} unavailable"),
            });
        }
        Ok(())
    }

    fn list<T>(source: &Mutex<Value>, item: impl Fn(Value) -> T) -> Vec<T> {
        Self::items(source.lock().unwrap().clone(), item)
    }

    fn items<T>(value: Value, item: impl Fn(Value) -> T) -> Vec<T> {
        match value {
            Value::Array(items) => items.into_iter().map(item).collect(),
            _ => Vec::new(),
        }
    }
}

impl SensorApi for FakeApi {
    async fn list_sensors(&self) -> Result<Vec<RawSensor>, Error> {
        self.enter(SENSORS).await?;
        Ok(Self::list(&self.sensors, RawSensor::from_value))
    }

    async fn get_sensor(&self, id: &str) -> Result<Option<RawSensor>, Error> {
        self.enter(DETAIL).await?;
        let detail = self.details.lock().unwrap().get(id).cloned();
        Ok(detail.map(RawSensor::from_value))
    }

    async fn list_realtime(&self) -> Result<Vec<RawSensor>, Error> {
        self.enter(REALTIME).await?;
        Ok(Self::list(&self.realtime, RawSensor::from_value))
    }

    async fn list_alerts(&self) -> Result<Vec<RawAlert>, Error> {
        let scripted = self.scripted_alerts.lock().unwrap().pop_front();
        if let Some((after, value)) = scripted {
            *self.calls.lock().unwrap().entry(ALERTS).or_default() += 1;
            tokio::time::sleep(after).await;
            return Ok(Self::items(value, RawAlert::from_value));
        }
        self.enter(ALERTS).await?;
        Ok(Self::list(&self.alerts, RawAlert::from_value))
    }

    async fn list_reports(&self) -> Result<ReportsPayload, Error> {
        self.enter(REPORTS).await?;
        let data = self.reports.lock().unwrap().clone();
        Ok(ReportsPayload::from_data(data))
    }

    async fn resolve_alert(&self, id: &str) -> Result<(), Error> {
        self.enter(RESOLVE).await?;
        self.resolved.lock().unwrap().push(id.to_owned());
        Ok(())
    }
}
