//! The single event handler that keeps the group index current and persists
//! it after every change.

use tracing::{debug, info, warn};

use crate::managers::group_index::GroupIndex;
use crate::managers::snapshot_writer::SnapshotWriter;
use crate::services::host::BrowserHost;
use crate::types::errors::HostError;
use crate::types::event::BrowserEventHandler;
use crate::types::group::{GroupMetadata, TabGroup};
use crate::types::snapshot::StorageKey;
use crate::types::tab::{Tab, TabId, WindowId};

/// Owns the group index for the lifetime of the background process.
pub struct GroupKeeper {
    index: GroupIndex,
    writer: SnapshotWriter,
    next_sequence: u64,
}

impl GroupKeeper {
    /// `next_sequence` is the first closed-window key this process may use.
    pub fn new(writer: SnapshotWriter, next_sequence: u64) -> Self {
        Self {
            index: GroupIndex::new(),
            writer,
            next_sequence,
        }
    }

    pub fn index(&self) -> &GroupIndex {
        &self.index
    }

    /// The key the next closed window will be saved under.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Loads every existing group and tab from the host, then writes the
    /// live snapshot once.
    pub async fn seed(&mut self, host: &dyn BrowserHost) -> Result<(), HostError> {
        let groups = host.query_groups().await?;
        let tabs = host.query_tabs().await?;

        for group in &groups {
            self.index
                .upsert_group(group.window_id, group.id, GroupMetadata::from(group));
        }
        for tab in tabs {
            if tab.is_grouped() {
                self.index.upsert_tab(tab.window_id, tab.group_id, tab);
            }
        }
        info!(
            groups = groups.len(),
            tabs = self.index.tab_count(),
            "seeded group index"
        );
        self.persist_live();
        Ok(())
    }

    fn persist_live(&self) {
        self.writer
            .submit(StorageKey::Current, self.index.live_snapshot());
    }

    fn apply_group(&mut self, group: &TabGroup) {
        if self
            .index
            .upsert_group(group.window_id, group.id, GroupMetadata::from(group))
        {
            self.persist_live();
        } else {
            debug!(group = group.id, window = group.window_id, "ignoring group event");
        }
    }

    fn apply_tab(&mut self, tab: Tab) {
        let (window_id, group_id) = (tab.window_id, tab.group_id);
        match tab.id {
            None => debug!(window = window_id, "ignoring tab without id"),
            Some(tab_id) => {
                if self.index.upsert_tab(window_id, group_id, tab) {
                    debug!(tab = tab_id, group = group_id, window = window_id, "tab recorded");
                    self.persist_live();
                }
            }
        }
    }
}

impl BrowserEventHandler for GroupKeeper {
    fn on_group_created(&mut self, group: TabGroup) {
        self.apply_group(&group);
    }

    fn on_group_updated(&mut self, group: TabGroup) {
        self.apply_group(&group);
    }

    fn on_group_removed(&mut self, group: TabGroup) {
        if self.index.remove_group(group.window_id, group.id) {
            debug!(group = group.id, window = group.window_id, "group removed");
            self.persist_live();
        }
    }

    fn on_tab_created(&mut self, tab: Tab) {
        self.apply_tab(tab);
    }

    fn on_tab_updated(&mut self, tab: Tab) {
        self.apply_tab(tab);
    }

    fn on_tab_removed(&mut self, tab_id: TabId, window_id: WindowId, is_window_closing: bool) {
        // The window's layout is saved from these tabs when its removal arrives.
        if is_window_closing {
            debug!(tab = tab_id, window = window_id, "keeping tab of closing window");
            return;
        }
        if self.index.remove_tab(window_id, tab_id) {
            debug!(tab = tab_id, window = window_id, "tab removed");
            self.persist_live();
        }
    }

    fn on_window_removed(&mut self, window_id: WindowId) {
        if self.index.is_window_closed(window_id) {
            warn!(window = window_id, "window closed twice");
            return;
        }
        let snapshot = self.index.snapshot(window_id);
        if snapshot.is_empty() {
            debug!(window = window_id, "closed window had no groups");
        } else {
            let key = StorageKey::Closed(self.next_sequence);
            self.next_sequence += 1;
            info!(window = window_id, %key, groups = snapshot.len(), "saving closed window");
            self.writer.submit(key, snapshot);
        }
        self.index.remove_window(window_id);
        self.persist_live();
    }
}
