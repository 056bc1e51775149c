//! App Core for tabkeeper.
//!
//! Wires storage, the host, the snapshot writer and the group keeper
//! together and runs the startup sequence.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::database::KeyValueStorage;
use crate::managers::group_keeper::GroupKeeper;
use crate::managers::snapshot_writer::SnapshotWriter;
use crate::services::host::BrowserHost;
use crate::services::restoration::{PendingRestore, RestorationReport};
use crate::types::event::BrowserEvent;
use crate::types::settings::KeeperSettings;

/// The background process: one keeper, one writer task, at most one
/// restoration in flight.
pub struct App {
    keeper: GroupKeeper,
    writer_task: JoinHandle<()>,
    restore_task: Option<JoinHandle<RestorationReport>>,
}

impl App {
    /// Startup sequence: take saved layouts out of storage, start the writer,
    /// seed the index from the host, then replay the saved layouts in the
    /// background.
    ///
    /// Nothing here is fatal. A failed read means nothing is restored; a
    /// failed seed leaves the index to fill from events. Saved live groups
    /// that the seed found open are not replayed.
    pub async fn start(
        settings: &KeeperSettings,
        storage: Arc<dyn KeyValueStorage>,
        host: Arc<dyn BrowserHost>,
    ) -> Self {
        let include_live = settings.restoration.restore_live_snapshot;
        let mut pending = if settings.restoration.enabled {
            match PendingRestore::take(storage.as_ref(), include_live).await {
                Ok(pending) => pending,
                Err(e) => {
                    warn!(error = %e, "could not read saved layouts; skipping restoration");
                    PendingRestore::empty()
                }
            }
        } else {
            info!("restoration disabled");
            PendingRestore::empty()
        };

        let (writer, writer_task) = SnapshotWriter::spawn(storage);
        let mut keeper = GroupKeeper::new(writer, pending.next_sequence());
        if let Err(e) = keeper.seed(host.as_ref()).await {
            warn!(error = %e, "could not seed group index from host");
        }
        // A restart under a running browser must not duplicate its groups.
        pending.discard_open(&keeper.index().live_snapshot());

        let restore_task = if pending.is_empty() {
            None
        } else {
            Some(tokio::spawn(pending.replay(host)))
        };

        Self {
            keeper,
            writer_task,
            restore_task,
        }
    }

    pub fn handle_event(&mut self, event: BrowserEvent) {
        event.dispatch(&mut self.keeper);
    }

    pub fn keeper(&self) -> &GroupKeeper {
        &self.keeper
    }

    /// Waits for the restoration started by [`App::start`], if any.
    pub async fn wait_for_restoration(&mut self) -> Option<RestorationReport> {
        let task = self.restore_task.take()?;
        match task.await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "restoration task failed");
                None
            }
        }
    }

    /// Shutdown sequence: let restoration finish, then flush queued writes.
    pub async fn shutdown(mut self) -> Option<RestorationReport> {
        let report = self.wait_for_restoration().await;
        let Self {
            keeper, writer_task, ..
        } = self;
        drop(keeper);
        if let Err(e) = writer_task.await {
            warn!(error = %e, "snapshot writer task failed");
        }
        report
    }
}
