//! `stats`: full refresh, then the aggregate figures.

use fieldsync_core::{Stats, SyncStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn detail(s: &Stats) -> String {
    output::detail_lines(&[
        ("Sensors", s.total_sensors.to_string()),
        ("Active alerts", s.active_alerts.to_string()),
        ("Avg temperature", format!("{:.1} °C", s.avg_temperature)),
        ("Avg humidity", format!("{:.1} %", s.avg_humidity)),
        ("Avg soil moisture", format!("{:.1} %", s.avg_soil_moisture)),
    ])
}

/// A failed collection does not abort the command; whatever loaded is
/// summarised and the recorded error goes to stderr.
pub async fn show(store: &SyncStore, global: &GlobalOpts) -> Result<(), CliError> {
    store.refresh_all().await;
    let snap = store.snapshot();

    let out = output::render_single(global.output, &snap.stats, detail, |s| {
        format!(
            "{} {} {:.1} {:.1} {:.1}",
            s.total_sensors, s.active_alerts, s.avg_temperature, s.avg_humidity, s.avg_soil_moisture
        )
    })?;
    output::print_output(&out, global.quiet);

    if let Some(err) = &snap.error {
        output::warn_line(err, output::should_color(global.color));
    }
    Ok(())
}
