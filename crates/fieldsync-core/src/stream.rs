// ── Reactive snapshot streams ──
//
// Subscription type for consuming store changes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::SyncSnapshot;

/// A subscription to the store's snapshot.
///
/// Provides point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting to a `Stream`. Every
/// value observed is a whole snapshot, never a partially applied write.
pub struct SnapshotStream {
    current: SyncSnapshot,
    receiver: watch::Receiver<SyncSnapshot>,
}

impl SnapshotStream {
    pub(crate) fn new(receiver: watch::Receiver<SyncSnapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot as of creation or the last `changed()`.
    pub fn current(&self) -> &SyncSnapshot {
        &self.current
    }

    /// The latest snapshot (may have changed since `current`).
    pub fn latest(&self) -> SyncSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once every store handle has been dropped.
    pub async fn changed(&mut self) -> Option<SyncSnapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` yielding the current snapshot, then one per change.
    pub fn into_stream(self) -> SnapshotWatchStream {
        SnapshotWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct SnapshotWatchStream {
    inner: WatchStream<SyncSnapshot>,
}

impl Stream for SnapshotWatchStream {
    type Item = SyncSnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
