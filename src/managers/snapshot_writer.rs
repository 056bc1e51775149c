//! Fire-and-forget snapshot writes.
//!
//! Event handlers hand a snapshot to [`SnapshotWriter::submit`] and move on.
//! A single drain task applies the writes to storage in submission order, so
//! the last write for a key always wins.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::database::KeyValueStorage;
use crate::types::snapshot::{StorageKey, WindowSnapshot};

/// One pending write.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    pub key: StorageKey,
    pub snapshot: WindowSnapshot,
}

/// Sending half of the write queue.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<WriteRequest>,
}

impl SnapshotWriter {
    /// A writer plus the raw queue, for callers that drain it themselves.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<WriteRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// A writer whose queue is drained into `storage` by a spawned task.
    ///
    /// The task ends once every writer clone is dropped and the queue is empty.
    pub fn spawn(storage: Arc<dyn KeyValueStorage>) -> (Self, JoinHandle<()>) {
        let (writer, rx) = Self::channel();
        let handle = tokio::spawn(drain(rx, storage));
        (writer, handle)
    }

    /// Queues a write without waiting for it.
    pub fn submit(&self, key: StorageKey, snapshot: WindowSnapshot) {
        if self.tx.send(WriteRequest { key, snapshot }).is_err() {
            warn!(%key, "snapshot writer is closed; dropping write");
        }
    }
}

/// Applies queued writes until the queue closes. Failed writes are logged
/// and lost.
pub async fn drain(
    mut rx: mpsc::UnboundedReceiver<WriteRequest>,
    storage: Arc<dyn KeyValueStorage>,
) {
    while let Some(request) = rx.recv().await {
        let key = request.key.to_string();
        match storage.set(&key, &request.snapshot).await {
            Ok(()) => debug!(key = %key, groups = request.snapshot.len(), "snapshot written"),
            Err(e) => warn!(key = %key, error = %e, "snapshot write failed"),
        }
    }
}
