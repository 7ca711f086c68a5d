//! Report command handler.

use tabled::Tabled;

use fieldsync_core::{Report, SyncStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Type")]
    report_type: String,
    #[tabled(rename = "Generated")]
    generated: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Sensors")]
    sensors: usize,
    #[tabled(rename = "Alerts")]
    alerts: usize,
    #[tabled(rename = "Avg Temp °C")]
    avg_temperature: String,
    #[tabled(rename = "Fields")]
    fields: String,
}

impl From<&Report> for ReportRow {
    fn from(r: &Report) -> Self {
        let day = |t: Option<chrono::DateTime<chrono::Utc>>| {
            t.map_or_else(|| "?".into(), |t| t.format("%Y-%m-%d").to_string())
        };
        let period = if r.period.start.is_none() && r.period.end.is_none() {
            "-".into()
        } else {
            format!("{} .. {}", day(r.period.start), day(r.period.end))
        };
        Self {
            report_type: output::or_dash(r.report_type.as_deref()),
            generated: r.generated_at.format("%Y-%m-%d %H:%M").to_string(),
            period,
            sensors: r.stats.total_sensors,
            alerts: r.stats.active_alerts,
            avg_temperature: format!("{:.1}", r.stats.avg_temperature),
            fields: if r.fields.is_empty() {
                "-".into()
            } else {
                r.fields.join(", ")
            },
        }
    }
}

pub async fn list(store: &SyncStore, global: &GlobalOpts) -> Result<(), CliError> {
    store.fetch_reports().await;
    let snap = store.snapshot();
    util::ensure_synced(&snap)?;

    let out = output::render_list(
        global.output,
        snap.reports.as_slice(),
        |r| ReportRow::from(r),
        |r| r.generated_at.to_rfc3339(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
