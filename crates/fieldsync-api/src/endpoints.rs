// Typed endpoint methods
//
// Sensors, realtime readings, alerts, and reports. Each method unwraps
// the `{ data: ... }` envelope; a missing `data` member is an empty
// result, never an error.

use serde_json::Value;
use tracing::debug;

use crate::client::RemoteClient;
use crate::error::Error;
use crate::models::{RawAlert, RawSensor, ReportsPayload, envelope_data, into_list};

impl RemoteClient {
    /// List all sensors.
    ///
    /// `GET /sensors`
    pub async fn list_sensors(&self) -> Result<Vec<RawSensor>, Error> {
        debug!("listing sensors");
        let body = self.get(&["sensors"]).await?;
        Ok(into_list(envelope_data(body), RawSensor::from_value))
    }

    /// Fetch one sensor's detail. `Ok(None)` when the envelope has no object.
    ///
    /// `GET /sensors/{id}`
    pub async fn get_sensor(&self, id: &str) -> Result<Option<RawSensor>, Error> {
        debug!(id, "fetching sensor detail");
        let body = self.get(&["sensors", id]).await?;
        Ok(match envelope_data(body) {
            data @ Value::Object(_) => Some(RawSensor::from_value(data)),
            _ => None,
        })
    }

    /// Latest readings.
    ///
    /// `GET /realtime`
    pub async fn list_realtime(&self) -> Result<Vec<RawSensor>, Error> {
        debug!("listing realtime readings");
        let body = self.get(&["realtime"]).await?;
        Ok(into_list(envelope_data(body), RawSensor::from_value))
    }

    /// Active alerts.
    ///
    /// `GET /alerts`
    pub async fn list_alerts(&self) -> Result<Vec<RawAlert>, Error> {
        debug!("listing alerts");
        let body = self.get(&["alerts"]).await?;
        Ok(into_list(envelope_data(body), RawAlert::from_value))
    }

    /// Generated reports.
    ///
    /// `GET /reports`
    ///
    /// Usually `{ data: [...] }`, but the service may also answer with a
    /// single object or a plain-text table, either inside `data` or as the
    /// whole body.
    pub async fn list_reports(&self) -> Result<ReportsPayload, Error> {
        debug!("listing reports");
        let body = self.get(&["reports"]).await?;
        let data = match body {
            Value::String(text) => Value::String(text),
            other => envelope_data(other),
        };
        Ok(ReportsPayload::from_data(data))
    }

    /// Resolve (acknowledge) one alert.
    ///
    /// `POST /alerts/{id}/resolve`
    ///
    /// Returns the envelope's `data`, or the whole body when there is none.
    pub async fn resolve_alert(&self, id: &str) -> Result<Value, Error> {
        debug!(id, "resolving alert");
        let body = self.post(&["alerts", id, "resolve"]).await?;
        let has_data = body.get("data").is_some_and(|d| !d.is_null());
        Ok(if has_data { envelope_data(body) } else { body })
    }
}
