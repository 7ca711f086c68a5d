//! `watch`: poll the service and print one line per store update.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;

use fieldsync_core::{AlertSeverity, PollingScheduler, Stats, SyncConfig, SyncSnapshot, SyncStore};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

/// Machine-readable form of one update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WatchLine<'a> {
    last_update: Option<DateTime<Utc>>,
    realtime: usize,
    critical_alerts: usize,
    stats: Stats,
    error: Option<&'a str>,
}

impl<'a> From<&'a SyncSnapshot> for WatchLine<'a> {
    fn from(snap: &'a SyncSnapshot) -> Self {
        Self {
            last_update: snap.last_update,
            realtime: snap.realtime.len(),
            critical_alerts: snap.alerts_by_severity(AlertSeverity::Critical).count(),
            stats: snap.stats,
            error: snap.error.as_deref(),
        }
    }
}

fn text_line(line: &WatchLine<'_>, color: bool) -> String {
    let time = line.last_update.map_or_else(
        || "--:--:--".into(),
        |t| t.with_timezone(&Local).format("%H:%M:%S").to_string(),
    );
    let critical = if color && line.critical_alerts > 0 {
        format!("{} critical", line.critical_alerts).red().bold().to_string()
    } else {
        format!("{} critical", line.critical_alerts)
    };
    let mut out = format!(
        "{time}  sensors {}  realtime {}  alerts {} ({critical})  avg {:.1} °C / {:.1} % / {:.1} %",
        line.stats.total_sensors,
        line.realtime,
        line.stats.active_alerts,
        line.stats.avg_temperature,
        line.stats.avg_humidity,
        line.stats.avg_soil_moisture,
    );
    if let Some(err) = line.error {
        if color {
            out.push_str(&format!("  {}", err.yellow()));
        } else {
            out.push_str(&format!("  [{err}]"));
        }
    }
    out
}

fn render(snap: &SyncSnapshot, format: OutputFormat, color: bool) -> Result<String, CliError> {
    let line = WatchLine::from(snap);
    Ok(match format {
        OutputFormat::Table | OutputFormat::Plain => text_line(&line, color),
        OutputFormat::Yaml => format!("---\n{}", serde_yaml::to_string(&line)?),
        // One object per line so the stream stays parseable
        OutputFormat::Json | OutputFormat::JsonCompact => serde_json::to_string(&line)?,
    })
}

pub async fn run(
    store: &SyncStore,
    config: &SyncConfig,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let interval = args
        .interval
        .map_or(config.polling_interval, Duration::from_secs);
    let color = output::should_color(global.color);

    store.refresh_all().await;
    let mut updates = store.subscribe();
    let mut last = render(updates.current(), global.output, color)?;
    output::print_output(&last, global.quiet);

    let poller = PollingScheduler::new(store.clone(), interval);
    poller.start();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                if let Err(e) = res {
                    tracing::warn!(error = %e, "could not listen for Ctrl-C");
                }
                break;
            }
            next = updates.changed() => {
                let Some(snap) = next else { break };
                let line = render(&snap, global.output, color)?;
                // Loading-flag flips produce identical lines
                if line != last {
                    output::print_output(&line, global.quiet);
                    last = line;
                }
            }
        }
    }

    poller.shutdown().await;
    Ok(())
}
