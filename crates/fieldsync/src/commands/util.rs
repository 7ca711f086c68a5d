//! Shared helpers for command handlers.

use std::io::IsTerminal;

use fieldsync_core::{Alert, Confirmation, SyncSnapshot};

use crate::error::CliError;

/// Fail with the store's recorded error, if the last operation set one.
pub fn ensure_synced(snap: &SyncSnapshot) -> Result<(), CliError> {
    match &snap.error {
        Some(message) => Err(CliError::SyncFailed {
            message: message.clone(),
        }),
        None => Ok(()),
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Refuse to prompt when nobody can answer.
pub fn require_interactive(action: &str, yes_flag: bool) -> Result<(), CliError> {
    if yes_flag || std::io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        })
    }
}

/// Terminal confirmation for alert resolution. `--yes` answers for the user.
#[derive(Debug, Clone, Copy)]
pub enum PromptConfirm {
    Assume,
    Ask,
}

impl PromptConfirm {
    pub fn new(yes_flag: bool) -> Self {
        if yes_flag { Self::Assume } else { Self::Ask }
    }
}

impl Confirmation for PromptConfirm {
    async fn confirm(&self, alert: &Alert) -> bool {
        if matches!(self, Self::Assume) {
            return true;
        }
        let prompt = format!(
            "Resolve {} alert {} ({})?",
            alert.severity, alert.id, alert.message
        );
        // dialoguer blocks on stdin
        let answer = tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await;
        match answer {
            Ok(Ok(yes)) => yes,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "confirmation prompt failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "confirmation prompt panicked");
                false
            }
        }
    }
}
