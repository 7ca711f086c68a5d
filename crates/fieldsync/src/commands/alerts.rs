//! Alert command handlers.

use tabled::Tabled;

use fieldsync_core::{Alert, AlertLifecycle, AlertSeverity, ResolveOutcome, SyncStore};

use crate::cli::{GlobalOpts, SeverityFilter};
use crate::error::CliError;
use crate::output;

use super::util::{self, PromptConfirm};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Sensor")]
    sensor: String,
    #[tabled(rename = "Type")]
    alert_type: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Threshold")]
    threshold: String,
    #[tabled(rename = "Time")]
    time: String,
}

impl From<&Alert> for AlertRow {
    fn from(a: &Alert) -> Self {
        Self {
            id: a.id.to_string(),
            severity: a.severity.to_string(),
            sensor: output::or_dash(a.sensor_id.as_ref()),
            alert_type: output::or_dash(a.alert_type.as_deref()),
            message: a.message.clone(),
            value: output::or_dash(a.value.as_ref()),
            threshold: output::or_dash(a.threshold.as_ref()),
            time: a.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(
    store: &SyncStore,
    severity: Option<SeverityFilter>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    store.fetch_alerts().await;
    let snap = store.snapshot();
    util::ensure_synced(&snap)?;

    let alerts: Vec<Alert> = match severity.map(AlertSeverity::from) {
        Some(level) => snap.alerts_by_severity(level).cloned().collect(),
        None => snap.alerts.to_vec(),
    };

    let out = output::render_list(
        global.output,
        &alerts,
        |a| AlertRow::from(a),
        |a| a.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn resolve(store: &SyncStore, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_interactive("resolve", global.yes)?;

    store.fetch_alerts().await;
    util::ensure_synced(&store.snapshot())?;

    let lifecycle = AlertLifecycle::new(store.clone(), PromptConfirm::new(global.yes));
    match lifecycle.resolve(id).await {
        ResolveOutcome::Resolved => {
            if !global.quiet {
                eprintln!("Alert {id} resolved");
            }
            Ok(())
        }
        ResolveOutcome::Declined => {
            if !global.quiet {
                eprintln!("Cancelled");
            }
            Ok(())
        }
        ResolveOutcome::NotFound => Err(CliError::NotFound {
            resource_type: "alert".into(),
            identifier: id.into(),
            list_command: "alerts".into(),
        }),
        ResolveOutcome::Failed { message } => Err(CliError::SyncFailed { message }),
    }
}
