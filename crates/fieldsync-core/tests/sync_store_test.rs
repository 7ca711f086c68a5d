#![allow(clippy::unwrap_used)]
// Store behavior against an in-memory service fake.

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;

use common::{ALERTS, DETAIL, FakeApi, REALTIME, REPORTS, RESOLVE, SENSORS};
use fieldsync_core::{AlertSeverity, ResolveOutcome, SensorStatus, SyncStore};

fn store() -> SyncStore<FakeApi> {
    SyncStore::new(FakeApi::seeded())
}

// ── Sensors ─────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_sensors_replaces_collection_and_stats() {
    let store = store();
    store.fetch_sensors().await;

    let snap = store.snapshot();
    assert_eq!(snap.sensors.len(), 2);
    assert_eq!(snap.sensors[0].id, "A1");
    assert_eq!(snap.sensors[0].location, "unknown zone");
    assert_eq!(snap.sensors[1].location, "North");
    assert_eq!(snap.stats.total_sensors, 2);
    assert_eq!(snap.stats.avg_temperature, 25.0);
    assert!(snap.last_update.is_some());
    assert!(!snap.is_loading());
    assert_eq!(snap.error, None);

    store
        .api()
        .set_sensors(json!([{ "id": "Z9", "temperature": 40, "humidity": 20 }]));
    store.fetch_sensors().await;

    let snap = store.snapshot();
    assert_eq!(snap.sensors.len(), 1);
    assert_eq!(snap.sensors[0].id, "Z9");
    assert_eq!(snap.sensors[0].status, SensorStatus::Critical);
    assert_eq!(snap.stats.total_sensors, 1);
    assert_eq!(snap.stats.avg_temperature, 40.0);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_sensors() {
    let store = store();
    store.fetch_sensors().await;

    store.api().fail(SENSORS);
    store.fetch_sensors().await;

    let snap = store.snapshot();
    assert_eq!(snap.sensors.len(), 2);
    assert_eq!(
        snap.error.as_deref(),
        Some("Service error (HTTP 503): sensors unavailable")
    );
    assert!(!snap.is_loading());
}

#[tokio::test]
async fn fetch_sensors_clears_previous_error() {
    let store = store();
    store.api().fail(SENSORS);
    store.fetch_sensors().await;
    assert!(store.snapshot().error.is_some());

    store.api().recover(SENSORS);
    store.fetch_sensors().await;
    assert_eq!(store.snapshot().error, None);
}

#[tokio::test(start_paused = true)]
async fn loading_is_visible_while_in_flight() {
    let store = store();
    store.api().delay(SENSORS, Duration::from_secs(1));

    let task = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_sensors().await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(store.snapshot().is_loading());

    task.await.unwrap();
    assert!(!store.snapshot().is_loading());
}

#[tokio::test(start_paused = true)]
async fn overlapping_fetches_clear_loading_only_when_all_settle() {
    let store = store();
    store.api().delay(SENSORS, Duration::from_secs(2));

    let slow = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_sensors().await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    store.api().delay(SENSORS, Duration::from_millis(100));
    store.fetch_sensors().await;
    assert!(store.snapshot().is_loading(), "slow fetch still in flight");

    slow.await.unwrap();
    assert!(!store.snapshot().is_loading());
}

#[tokio::test(start_paused = true)]
async fn dropped_fetch_releases_loading() {
    let store = store();
    store.api().delay(SENSORS, Duration::from_secs(30));

    let result = tokio::time::timeout(Duration::from_secs(1), store.fetch_sensors()).await;
    assert!(result.is_err());
    assert!(!store.snapshot().is_loading());
}

// ── Realtime ────────────────────────────────────────────────────────

#[tokio::test]
async fn realtime_is_separate_from_sensors() {
    let store = store();
    store.fetch_realtime().await;

    let snap = store.snapshot();
    assert_eq!(snap.realtime.len(), 1);
    assert_eq!(snap.realtime[0].temperature, 21.5);
    assert!(snap.sensors.is_empty());
    assert_eq!(snap.stats.total_sensors, 0);
    assert!(snap.last_update.is_some());
    assert_eq!(store.api().calls(SENSORS), 0);
}

#[tokio::test(start_paused = true)]
async fn realtime_never_shows_loading() {
    let store = store();
    store.api().delay(REALTIME, Duration::from_secs(1));

    let task = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_realtime().await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!store.snapshot().is_loading());
    task.await.unwrap();
}

// ── Alerts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn alerts_update_active_count_without_sensors() {
    let store = store();
    store.fetch_alerts().await;

    let snap = store.snapshot();
    assert_eq!(snap.alerts.len(), 2);
    assert_eq!(snap.stats.active_alerts, 2);
    assert_eq!(snap.stats.total_sensors, 0);
    assert_eq!(snap.alerts_by_severity(AlertSeverity::Critical).count(), 1);
    assert_eq!(snap.alerts_by_severity(AlertSeverity::Info).count(), 0);
}

#[tokio::test]
async fn unknown_severity_becomes_info() {
    let store = store();
    store
        .api()
        .set_alerts(json!([{ "id": "al-9", "severity": "apocalyptic" }, { "id": "al-10" }]));
    store.fetch_alerts().await;

    let snap = store.snapshot();
    assert_eq!(snap.alerts_by_severity(AlertSeverity::Info).count(), 2);
}

#[tokio::test]
async fn failed_alert_fetch_keeps_previous_alerts() {
    let store = store();
    store.fetch_alerts().await;
    store.api().fail(ALERTS);
    store.fetch_alerts().await;

    let snap = store.snapshot();
    assert_eq!(snap.alerts.len(), 2);
    assert_eq!(
        snap.error.as_deref(),
        Some("Service error (HTTP 503): alerts unavailable")
    );
}

// ── Reports ─────────────────────────────────────────────────────────

#[tokio::test]
async fn reports_accept_every_payload_shape() {
    let store = store();
    store.fetch_reports().await;
    assert_eq!(store.snapshot().reports.len(), 1);

    store.api().set_reports(json!({ "reportType": "weekly" }));
    store.fetch_reports().await;
    let snap = store.snapshot();
    assert_eq!(snap.reports.len(), 1);
    assert_eq!(snap.reports[0].report_type.as_deref(), Some("weekly"));

    store
        .api()
        .set_reports(json!("reportType,fields\nmonthly,F1;F2\nmonthly,F3\n"));
    store.fetch_reports().await;
    let snap = store.snapshot();
    assert_eq!(snap.reports.len(), 2);
    assert_eq!(snap.reports[0].fields, vec!["F1", "F2"]);

    store.api().set_reports(json!(null));
    store.fetch_reports().await;
    assert!(store.snapshot().reports.is_empty());
}

// ── Resolve ─────────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_removes_exactly_one_alert() {
    let store = store();
    store.fetch_alerts().await;

    let outcome = store.resolve_alert("al-1").await;

    assert_eq!(outcome, ResolveOutcome::Resolved);
    let snap = store.snapshot();
    assert_eq!(snap.alerts.len(), 1);
    assert_eq!(snap.alerts[0].id, "al-2");
    assert_eq!(snap.stats.active_alerts, 1);
    assert_eq!(store.api().resolved_ids(), vec!["al-1"]);
}

#[tokio::test]
async fn resolve_unknown_alert_is_noop() {
    let store = store();
    store.fetch_alerts().await;
    let before = store.snapshot();

    let outcome = store.resolve_alert("al-404").await;

    assert_eq!(outcome, ResolveOutcome::NotFound);
    assert_eq!(store.api().calls(RESOLVE), 0);
    let after = store.snapshot();
    assert_eq!(after.alerts, before.alerts);
    assert_eq!(after.stats, before.stats);
}

#[tokio::test]
async fn failed_resolve_keeps_alert() {
    let store = store();
    store.fetch_alerts().await;
    store.api().fail(RESOLVE);

    let outcome = store.resolve_alert("al-1").await;

    assert_eq!(
        outcome,
        ResolveOutcome::Failed {
            message: "Service error (HTTP 503): resolve unavailable".into()
        }
    );
    let snap = store.snapshot();
    assert_eq!(snap.alerts.len(), 2);
    assert_eq!(snap.stats.active_alerts, 2);
    assert!(snap.error.is_some());
}

#[tokio::test]
async fn resolved_alert_stays_gone_while_service_still_lists_it() {
    let store = store();
    store.fetch_alerts().await;
    store.resolve_alert("al-1").await;

    // The service hasn't caught up yet.
    store.fetch_alerts().await;
    let snap = store.snapshot();
    assert_eq!(snap.alerts.len(), 1);
    assert_eq!(snap.stats.active_alerts, 1);

    // Service drops it, then later raises a fresh alert with the same id.
    store.api().set_alerts(json!([{ "id": "al-2", "severity": "warning" }]));
    store.fetch_alerts().await;
    store.api().set_alerts(json!([
        { "id": "al-1", "severity": "critical" },
        { "id": "al-2", "severity": "warning" }
    ]));
    store.fetch_alerts().await;
    assert_eq!(store.snapshot().alerts.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_fetch_issued_before_resolve_cannot_bring_alert_back() {
    let store = store();
    store.fetch_alerts().await;

    let both = json!([
        { "id": "al-1", "severity": "critical" },
        { "id": "al-2", "severity": "warning" }
    ]);
    store.api().script_alerts(Duration::from_secs(10), both);
    store
        .api()
        .script_alerts(Duration::ZERO, json!([{ "id": "al-2", "severity": "warning" }]));

    let slow = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_alerts().await }
    });
    while store.api().calls(ALERTS) < 2 {
        tokio::task::yield_now().await;
    }

    assert_eq!(store.resolve_alert("al-1").await, ResolveOutcome::Resolved);
    store.fetch_alerts().await;
    assert_eq!(store.snapshot().alerts.len(), 1);

    slow.await.unwrap();
    let snap = store.snapshot();
    assert!(snap.alert("al-1").is_none());
    assert_eq!(snap.alerts.len(), 1);
    assert_eq!(snap.stats.active_alerts, 1);

    // Once nothing stale is in flight, a fresh listing without the id
    // retires the tombstone and a re-raised alert shows again.
    store.api().set_alerts(json!([{ "id": "al-2", "severity": "warning" }]));
    store.fetch_alerts().await;
    store.api().set_alerts(json!([
        { "id": "al-1", "severity": "critical" },
        { "id": "al-2", "severity": "warning" }
    ]));
    store.fetch_alerts().await;
    assert_eq!(store.snapshot().alerts.len(), 2);
}

// ── Selection ───────────────────────────────────────────────────────

#[tokio::test]
async fn select_sensor_stores_detail() {
    let store = store();
    store
        .api()
        .set_detail("A1", json!({ "phLevel": 6.5, "temperature": 22 }));

    store.select_sensor("A1").await;

    let snap = store.snapshot();
    let selected = snap.selected_sensor.as_ref().unwrap();
    assert_eq!(selected.id, "A1");
    assert_eq!(selected.ph_level, Some(6.5));
    assert!(!snap.is_loading());
}

#[tokio::test]
async fn failed_selection_keeps_previous_one() {
    let store = store();
    store.api().set_detail("A1", json!({ "sensorId": "A1" }));
    store.select_sensor("A1").await;

    store.api().fail(DETAIL);
    store.select_sensor("A2").await;

    let snap = store.snapshot();
    assert_eq!(snap.selected_sensor.as_ref().unwrap().id, "A1");
    assert!(snap.error.is_some());
    assert!(!snap.is_loading());
}

#[tokio::test]
async fn empty_detail_clears_selection() {
    let store = store();
    store.api().set_detail("A1", json!({ "sensorId": "A1" }));
    store.select_sensor("A1").await;

    store.select_sensor("ghost").await;

    assert!(store.snapshot().selected_sensor.is_none());
}

// ── Refresh all ─────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_all_isolates_a_failing_branch() {
    let store = store();
    store
        .api()
        .set_alerts(json!([{ "id": "old-1", "severity": "info" }]));
    store.fetch_alerts().await;

    store.api().set_alerts(json!([{ "id": "new-1" }, { "id": "new-2" }]));
    store.api().fail(ALERTS);
    store.refresh_all().await;

    let snap = store.snapshot();
    assert!(!snap.is_loading());
    assert_eq!(snap.sensors.len(), 2);
    assert_eq!(snap.realtime.len(), 1);
    assert_eq!(snap.reports.len(), 1);
    assert_eq!(snap.alerts.len(), 1);
    assert_eq!(snap.alerts[0].id, "old-1");
    assert_eq!(
        snap.error.as_deref(),
        Some("Service error (HTTP 503): alerts unavailable")
    );
    assert_eq!(store.api().calls(SENSORS), 1);
    assert_eq!(store.api().calls(REALTIME), 1);
    assert_eq!(store.api().calls(REPORTS), 1);
    assert_eq!(store.api().calls(ALERTS), 2);
}

#[tokio::test(start_paused = true)]
async fn refresh_all_stays_loading_until_slowest_settles() {
    let store = store();
    store.api().delay(REPORTS, Duration::from_secs(3));

    let task = tokio::spawn({
        let store = store.clone();
        async move { store.refresh_all().await }
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    let snap = store.snapshot();
    assert_eq!(snap.sensors.len(), 2, "fast branches land early");
    assert!(snap.is_loading());

    task.await.unwrap();
    let snap = store.snapshot();
    assert!(!snap.is_loading());
    assert_eq!(snap.reports.len(), 1);
}

// ── Flags and derived state ─────────────────────────────────────────

#[tokio::test]
async fn clear_error_touches_nothing_else() {
    let store = store();
    store.fetch_sensors().await;
    store.api().fail(REPORTS);
    store.fetch_reports().await;

    let before = store.snapshot();
    store.clear_error();
    let after = store.snapshot();

    assert_eq!(after.error, None);
    assert_eq!(after.sensors, before.sensors);
    assert_eq!(after.stats, before.stats);
    assert_eq!(after.last_update, before.last_update);
}

#[tokio::test]
async fn calculate_stats_is_idempotent() {
    let store = store();
    store.refresh_all().await;

    let first = store.calculate_stats();
    let second = store.calculate_stats();
    assert_eq!(first, second);
    assert_eq!(store.snapshot().stats, first);
    assert_eq!(first.active_alerts, 2);
    assert_eq!(first.total_sensors, 2);
}

#[tokio::test]
async fn reset_returns_to_initial_state() {
    let store = store();
    store.refresh_all().await;
    store.reset();

    let snap = store.snapshot();
    assert!(snap.sensors.is_empty());
    assert!(snap.alerts.is_empty());
    assert!(snap.reports.is_empty());
    assert_eq!(snap.stats, fieldsync_core::Stats::default());
    assert_eq!(snap.last_update, None);
}

#[tokio::test]
async fn subscribers_see_whole_snapshots() {
    let store = store();
    let mut sub = store.subscribe();

    store.fetch_sensors().await;
    let snap = sub.changed().await.unwrap();
    let latest = sub.latest();
    // Whatever intermediate state was observed, sensors and stats agree.
    assert_eq!(snap.stats.total_sensors, snap.sensors.len());
    assert_eq!(latest.stats.total_sensors, 2);
}
