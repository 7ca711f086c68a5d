//! Sensor command handlers.

use tabled::Tabled;

use fieldsync_core::{Sensor, SyncStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Temp °C")]
    temperature: String,
    #[tabled(rename = "Humidity %")]
    humidity: String,
    #[tabled(rename = "Soil %")]
    soil_moisture: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Sensor> for SensorRow {
    fn from(s: &Sensor) -> Self {
        Self {
            id: s.id.to_string(),
            name: output::or_dash(s.name.as_deref()),
            location: s.location.clone(),
            temperature: format!("{:.1}", s.temperature),
            humidity: format!("{:.1}", s.humidity),
            soil_moisture: format!("{:.1}", s.soil_moisture),
            status: s.status.to_string(),
            updated: s.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn detail_view(s: &Sensor, color: bool) -> String {
    let mut pairs = vec![
        ("ID", s.id.to_string()),
        ("Sensor ID", s.sensor_id.to_string()),
        ("Name", output::or_dash(s.name.as_deref())),
        ("Location", s.location.clone()),
        ("Field", output::or_dash(s.field_id.as_deref())),
        ("Crop", output::or_dash(s.crop_type.as_deref())),
        ("Area (ha)", output::or_dash(s.area_hectares)),
        ("Temperature", format!("{:.1} °C", s.temperature)),
        ("Humidity", format!("{:.1} %", s.humidity)),
        ("Soil moisture", format!("{:.1} %", s.soil_moisture)),
        ("pH", output::or_dash(s.ph_level)),
        ("Water level", output::or_dash(s.water_level)),
        ("Light", output::or_dash(s.light_intensity)),
        ("Status", output::paint_status(s.status, color)),
        ("Updated", s.timestamp.to_rfc3339()),
    ];
    for (metric, label) in &s.alerts {
        pairs.push(("Alert", format!("{metric}: {label}")));
    }
    output::detail_lines(&pairs)
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(store: &SyncStore, global: &GlobalOpts) -> Result<(), CliError> {
    store.fetch_sensors().await;
    let snap = store.snapshot();
    util::ensure_synced(&snap)?;

    let out = output::render_list(
        global.output,
        snap.sensors.as_slice(),
        |s| SensorRow::from(s),
        |s| s.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn realtime(store: &SyncStore, global: &GlobalOpts) -> Result<(), CliError> {
    store.fetch_realtime().await;
    let snap = store.snapshot();
    util::ensure_synced(&snap)?;

    let out = output::render_list(
        global.output,
        snap.realtime.as_slice(),
        |s| SensorRow::from(s),
        |s| s.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn detail(store: &SyncStore, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    store.select_sensor(id).await;
    let snap = store.snapshot();
    util::ensure_synced(&snap)?;

    let sensor = snap.selected_sensor.ok_or_else(|| CliError::NotFound {
        resource_type: "sensor".into(),
        identifier: id.into(),
        list_command: "sensors".into(),
    })?;

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        sensor.as_ref(),
        |s| detail_view(s, color),
        |s| s.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
