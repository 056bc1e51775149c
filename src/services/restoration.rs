//! Replays saved layouts on startup.
//!
//! Restoration is consume-once: every stored entry is read, the namespace is
//! cleared, and only then are tabs recreated. A crash after the clear loses
//! whatever had not been regrouped yet.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::database::KeyValueStorage;
use crate::services::host::BrowserHost;
use crate::types::errors::RestoreError;
use crate::types::group::GroupUpdate;
use crate::types::snapshot::{PersistedGroup, StorageKey, WindowSnapshot};
use crate::types::tab::TabId;

/// What happened to one restored group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOutcome {
    /// Tabs were created and grouped; the update may still have failed.
    Restored { tabs_created: usize, tabs_failed: usize },
    /// No tab survived creation, so there was nothing to group.
    Skipped { tabs_failed: usize },
    /// Grouping the created tabs failed; they stay open ungrouped.
    Failed { tabs_created: usize, tabs_failed: usize, error: String },
}

/// Overall restoration result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestorationReport {
    pub groups_restored: usize,
    pub groups_skipped: usize,
    pub groups_failed: usize,
    pub tabs_created: usize,
    pub tabs_failed: usize,
}

impl RestorationReport {
    fn record(&mut self, outcome: &GroupOutcome) {
        match outcome {
            GroupOutcome::Restored { tabs_created, tabs_failed } => {
                self.groups_restored += 1;
                self.tabs_created += tabs_created;
                self.tabs_failed += tabs_failed;
            }
            GroupOutcome::Skipped { tabs_failed } => {
                self.groups_skipped += 1;
                self.tabs_failed += tabs_failed;
            }
            GroupOutcome::Failed { tabs_created, tabs_failed, .. } => {
                self.groups_failed += 1;
                self.tabs_created += tabs_created;
                self.tabs_failed += tabs_failed;
            }
        }
    }

    /// Whether every saved tab came back inside its group.
    pub fn all_successful(&self) -> bool {
        self.groups_failed == 0 && self.groups_skipped == 0 && self.tabs_failed == 0
    }
}

/// Layouts read out of storage and waiting to be replayed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingRestore {
    entries: Vec<(StorageKey, WindowSnapshot)>,
    next_sequence: u64,
}

impl PendingRestore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads every stored layout, then clears the namespace.
    ///
    /// Closed-window layouts are kept in key order. The live `"current"`
    /// layout is kept only with `include_live`, after the closed ones. Keys
    /// we never write are dropped. If the read fails nothing is cleared.
    pub async fn take(
        storage: &dyn KeyValueStorage,
        include_live: bool,
    ) -> Result<Self, RestoreError> {
        let stored = storage.get_all().await.map_err(RestoreError::Read)?;

        let mut closed = Vec::new();
        let mut live = None;
        for (raw_key, snapshot) in stored {
            match raw_key.parse::<StorageKey>() {
                Ok(StorageKey::Closed(seq)) => closed.push((seq, snapshot)),
                Ok(StorageKey::Current) => live = Some(snapshot),
                Err(e) => warn!(error = %e, "discarding foreign storage entry"),
            }
        }
        closed.sort_by_key(|(seq, _)| *seq);
        let next_sequence = closed.last().map(|(seq, _)| seq + 1).unwrap_or(0);

        storage.clear().await.map_err(RestoreError::Clear)?;

        let mut entries: Vec<(StorageKey, WindowSnapshot)> = closed
            .into_iter()
            .map(|(seq, snapshot)| (StorageKey::Closed(seq), snapshot))
            .collect();
        match live {
            Some(snapshot) if include_live && !snapshot.is_empty() => {
                entries.push((StorageKey::Current, snapshot));
            }
            Some(snapshot) if !snapshot.is_empty() => {
                debug!(groups = snapshot.len(), "discarding live snapshot");
            }
            _ => {}
        }

        Ok(Self {
            entries,
            next_sequence,
        })
    }

    /// Drops groups of the live layout that are still open in the host.
    ///
    /// Each open group cancels at most one saved group with the same title,
    /// color and URLs. Closed-window layouts are never touched. Returns how
    /// many groups were dropped.
    pub fn discard_open(&mut self, open: &[PersistedGroup]) -> usize {
        let live_pos = self
            .entries
            .iter()
            .position(|(key, _)| *key == StorageKey::Current);
        let Some(pos) = live_pos else {
            return 0;
        };

        let live = &mut self.entries[pos].1;
        let before = live.len();
        for group in open {
            if let Some(i) = live.iter().position(|saved| saved == group) {
                live.remove(i);
            }
        }
        let dropped = before - live.len();
        if live.is_empty() {
            self.entries.remove(pos);
        }
        if dropped > 0 {
            debug!(dropped, "live layout groups are still open");
        }
        dropped
    }

    /// One past the highest closed-window key that was stored.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn entries(&self) -> &[(StorageKey, WindowSnapshot)] {
        &self.entries
    }

    pub fn group_count(&self) -> usize {
        self.entries.iter().map(|(_, s)| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.group_count() == 0
    }

    /// Recreates every saved group. Groups are independent and run
    /// concurrently; nothing orders one group's requests against another's.
    pub async fn replay(self, host: Arc<dyn BrowserHost>) -> RestorationReport {
        let groups: Vec<PersistedGroup> = self
            .entries
            .into_iter()
            .flat_map(|(_, snapshot)| snapshot)
            .collect();
        if groups.is_empty() {
            return RestorationReport::default();
        }

        info!(groups = groups.len(), "restoring saved tab groups");
        let outcomes =
            join_all(groups.iter().map(|group| restore_group(host.as_ref(), group))).await;

        let mut report = RestorationReport::default();
        for outcome in &outcomes {
            report.record(outcome);
        }
        info!(
            restored = report.groups_restored,
            skipped = report.groups_skipped,
            failed = report.groups_failed,
            tabs = report.tabs_created,
            "restoration finished"
        );
        report
    }
}

/// Creates the group's tabs, waits for all of them, then groups the ones
/// that came back with an id and applies the title and color.
pub async fn restore_group(host: &dyn BrowserHost, group: &PersistedGroup) -> GroupOutcome {
    let created =
        join_all(group.tab_urls.iter().map(|url| host.create_tab(url.as_deref()))).await;

    let mut tab_ids: Vec<TabId> = Vec::with_capacity(created.len());
    let mut tabs_failed = 0;
    for result in created {
        match result {
            Ok(tab) => match tab.id {
                Some(id) => tab_ids.push(id),
                None => tabs_failed += 1,
            },
            Err(e) => {
                warn!(error = %e, "tab creation failed");
                tabs_failed += 1;
            }
        }
    }

    if tab_ids.is_empty() {
        debug!(title = ?group.title, "no tabs to group");
        return GroupOutcome::Skipped { tabs_failed };
    }

    let tabs_created = tab_ids.len();
    let group_id = match host.group_tabs(&tab_ids).await {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, title = ?group.title, "grouping restored tabs failed");
            return GroupOutcome::Failed {
                tabs_created,
                tabs_failed,
                error: e.to_string(),
            };
        }
    };

    let update = GroupUpdate {
        title: group.title.clone(),
        color: group.color,
    };
    if let Err(e) = host.update_group(group_id, &update).await {
        warn!(group = group_id, error = %e, "restoring group title/color failed");
    }
    GroupOutcome::Restored {
        tabs_created,
        tabs_failed,
    }
}
