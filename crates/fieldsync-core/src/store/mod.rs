// ── Synchronized state container ──
//
// `SyncStore` owns the sensor, realtime, alert, and report collections
// plus derived stats and status flags. All writes go through its
// operations; consumers only ever see whole `SyncSnapshot`s.

mod snapshot;
mod sync_store;

pub use snapshot::SyncSnapshot;
pub use sync_store::SyncStore;
