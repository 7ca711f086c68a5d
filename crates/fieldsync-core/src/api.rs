// ── Remote service port ──
//
// The store talks to the monitoring service through `SensorApi` so tests
// can substitute an in-memory fake. `RemoteClient` is the production impl.

use std::future::Future;

use fieldsync_api::{RawAlert, RawSensor, RemoteClient, ReportsPayload};

/// Operations the store needs from the monitoring service.
pub trait SensorApi: Send + Sync + 'static {
    fn list_sensors(
        &self,
    ) -> impl Future<Output = Result<Vec<RawSensor>, fieldsync_api::Error>> + Send;

    /// `Ok(None)` when the service answered without a sensor object.
    fn get_sensor(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<RawSensor>, fieldsync_api::Error>> + Send;

    fn list_realtime(
        &self,
    ) -> impl Future<Output = Result<Vec<RawSensor>, fieldsync_api::Error>> + Send;

    fn list_alerts(
        &self,
    ) -> impl Future<Output = Result<Vec<RawAlert>, fieldsync_api::Error>> + Send;

    fn list_reports(
        &self,
    ) -> impl Future<Output = Result<ReportsPayload, fieldsync_api::Error>> + Send;

    fn resolve_alert(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<(), fieldsync_api::Error>> + Send;
}

impl SensorApi for RemoteClient {
    async fn list_sensors(&self) -> Result<Vec<RawSensor>, fieldsync_api::Error> {
        RemoteClient::list_sensors(self).await
    }

    async fn get_sensor(&self, id: &str) -> Result<Option<RawSensor>, fieldsync_api::Error> {
        RemoteClient::get_sensor(self, id).await
    }

    async fn list_realtime(&self) -> Result<Vec<RawSensor>, fieldsync_api::Error> {
        RemoteClient::list_realtime(self).await
    }

    async fn list_alerts(&self) -> Result<Vec<RawAlert>, fieldsync_api::Error> {
        RemoteClient::list_alerts(self).await
    }

    async fn list_reports(&self) -> Result<ReportsPayload, fieldsync_api::Error> {
        RemoteClient::list_reports(self).await
    }

    async fn resolve_alert(&self, id: &str) -> Result<(), fieldsync_api::Error> {
        RemoteClient::resolve_alert(self, id).await.map(drop)
    }
}
