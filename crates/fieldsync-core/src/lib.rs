// fieldsync-core: Synchronized state between fieldsync-api and consumers (CLI, dashboards).

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod normalize;
pub mod poller;
pub mod stats;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::SensorApi;
pub use config::{SyncConfig, TlsVerification};
pub use error::CoreError;
pub use lifecycle::{AlertLifecycle, AutoConfirm, Confirmation, ResolveOutcome};
pub use poller::{DEFAULT_POLLING_INTERVAL, PollingScheduler};
pub use stats::compute_stats;
pub use store::{SyncSnapshot, SyncStore};
pub use stream::SnapshotStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Alert, AlertMeasure, AlertSeverity, EntityId, Report, ReportPeriod, Sensor, SensorStatus,
    Stats, UNKNOWN_ZONE,
};
