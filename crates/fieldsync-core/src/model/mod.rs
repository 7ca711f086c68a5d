// ── Canonical domain model ──
//
// Every type in this module is the strongly-typed form of a monitoring
// service payload. Raw shapes (identity aliases, stringly numbers, reports
// as text tables) never get past `crate::normalize`.

pub mod alert;
pub mod entity_id;
pub mod report;
pub mod sensor;
pub mod stats;

pub use alert::{Alert, AlertMeasure, AlertSeverity};
pub use entity_id::EntityId;
pub use report::{Report, ReportPeriod};
pub use sensor::{Sensor, SensorStatus, UNKNOWN_ZONE};
pub use stats::Stats;
