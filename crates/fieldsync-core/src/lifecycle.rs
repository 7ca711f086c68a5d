// ── Alert resolution ──
//
// An alert is either active or resolved, and resolved is terminal. The
// transition asks a `Confirmation` first; only a "yes" reaches the
// service, and only a successful call removes the alert from the store.

use std::future::Future;

use fieldsync_api::RemoteClient;
use tracing::info;

use crate::api::SensorApi;
use crate::model::Alert;
use crate::store::SyncStore;

/// Result of a resolve attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The service confirmed; the alert left the active set.
    Resolved,
    /// The confirmation gate said no. Nothing was sent.
    Declined,
    /// No active alert has that id. Nothing was sent.
    NotFound,
    /// The service call failed; the alert is still active and the store's
    /// error carries the same message.
    Failed { message: String },
}

/// Yes/no gate consulted before an alert is resolved.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, alert: &Alert) -> impl Future<Output = bool> + Send;
}

/// Confirms everything. For tests and non-interactive callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirmation for AutoConfirm {
    async fn confirm(&self, _alert: &Alert) -> bool {
        true
    }
}

/// Gated `active -> resolved` transition over a [`SyncStore`].
pub struct AlertLifecycle<C, A: SensorApi = RemoteClient> {
    store: SyncStore<A>,
    confirmation: C,
}

impl<C: Confirmation, A: SensorApi> AlertLifecycle<C, A> {
    pub fn new(store: SyncStore<A>, confirmation: C) -> Self {
        Self {
            store,
            confirmation,
        }
    }

    pub fn store(&self) -> &SyncStore<A> {
        &self.store
    }

    /// Ask for confirmation, then resolve.
    pub async fn resolve(&self, id: &str) -> ResolveOutcome {
        let Some(alert) = self.store.snapshot().alert(id).cloned() else {
            return ResolveOutcome::NotFound;
        };

        if !self.confirmation.confirm(&alert).await {
            info!(id, "alert resolution declined");
            return ResolveOutcome::Declined;
        }

        self.store.resolve_alert(id).await
    }
}
