//! In-memory mirror of which tabs belong to which group in which window.
//!
//! The index is fed by host events in whatever order they arrive. A tab seen
//! before its group's creation event gets a bucket with no metadata; a group
//! removal drops whatever members are still recorded. Each member is stored
//! with its window and group ids rewritten to the bucket it sits in. Reverse
//! maps from tab id to bucket and from group id to window let removals and
//! moves find their target. Group ids are unique across windows, so a group
//! reported in a new window is moved there with its members.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::types::group::{GroupId, GroupMetadata, TAB_GROUP_ID_NONE};
use crate::types::snapshot::{PersistedGroup, WindowSnapshot};
use crate::types::tab::{Tab, TabId, WindowId};

/// One tab group as currently known.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupRecord {
    /// Absent until the first group-level event for this group arrives.
    pub metadata: Option<GroupMetadata>,
    pub members: HashMap<TabId, Tab>,
}

impl GroupRecord {
    /// Member tabs in window order.
    pub fn ordered_members(&self) -> Vec<&Tab> {
        let mut tabs: Vec<&Tab> = self.members.values().collect();
        tabs.sort_by_key(|t| (t.index, t.id));
        tabs
    }

    fn first_index(&self) -> Option<i32> {
        self.members.values().map(|t| t.index).min()
    }

    fn to_persisted(&self) -> PersistedGroup {
        PersistedGroup {
            title: self.metadata.as_ref().and_then(|m| m.title.clone()),
            color: self.metadata.as_ref().map(|m| m.color),
            tab_urls: self
                .ordered_members()
                .into_iter()
                .map(|t| t.url.clone())
                .collect(),
        }
    }
}

type WindowBucket = BTreeMap<GroupId, GroupRecord>;

/// Window id -> group id -> group record.
#[derive(Debug, Default)]
pub struct GroupIndex {
    windows: BTreeMap<WindowId, WindowBucket>,
    locations: HashMap<TabId, (WindowId, GroupId)>,
    group_windows: HashMap<GroupId, WindowId>,
    closed_windows: HashSet<WindowId>,
}

impl GroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a group's metadata, creating the bucket if needed.
    /// A group recorded under another window moves to this one.
    ///
    /// Returns `false` when the window has already closed.
    pub fn upsert_group(
        &mut self,
        window_id: WindowId,
        group_id: GroupId,
        metadata: GroupMetadata,
    ) -> bool {
        if self.closed_windows.contains(&window_id) || group_id == TAB_GROUP_ID_NONE {
            return false;
        }
        self.relocate_group(group_id, window_id);
        self.group_windows.insert(group_id, window_id);
        let record = self
            .windows
            .entry(window_id)
            .or_default()
            .entry(group_id)
            .or_default();
        record.metadata = Some(metadata);
        true
    }

    /// Drops a group and every member still recorded in it, in whichever
    /// window it is recorded. Absent groups are not an error: the host removes
    /// empty groups on its own.
    pub fn remove_group(&mut self, _window_id: WindowId, group_id: GroupId) -> bool {
        let Some(window_id) = self.group_windows.remove(&group_id) else {
            return false;
        };
        let Some(bucket) = self.windows.get_mut(&window_id) else {
            return false;
        };
        let Some(record) = bucket.remove(&group_id) else {
            return false;
        };
        for tab_id in record.members.keys() {
            self.locations.remove(tab_id);
        }
        true
    }

    /// Inserts or overwrites a tab inside the addressed group.
    ///
    /// A tab already recorded elsewhere is moved; a tab reported as ungrouped
    /// is dropped from the index. Tabs without an id cannot be tracked and are
    /// ignored. Returns whether the index was touched.
    pub fn upsert_tab(&mut self, window_id: WindowId, group_id: GroupId, mut tab: Tab) -> bool {
        if self.closed_windows.contains(&window_id) {
            return false;
        }
        let Some(tab_id) = tab.id else {
            return false;
        };

        if group_id != TAB_GROUP_ID_NONE {
            self.relocate_group(group_id, window_id);
        }
        let previous = self.locations.get(&tab_id).copied();
        let mut detached = false;
        if previous.is_some() && previous != Some((window_id, group_id)) {
            detached = self.detach(tab_id);
        }
        if group_id == TAB_GROUP_ID_NONE {
            return detached;
        }

        tab.window_id = window_id;
        tab.group_id = group_id;
        self.windows
            .entry(window_id)
            .or_default()
            .entry(group_id)
            .or_default()
            .members
            .insert(tab_id, tab);
        self.locations.insert(tab_id, (window_id, group_id));
        self.group_windows.insert(group_id, window_id);
        true
    }

    /// Removes a closed tab wherever it is recorded.
    pub fn remove_tab(&mut self, _window_id: WindowId, tab_id: TabId) -> bool {
        self.detach(tab_id)
    }

    /// Drops the whole window. Later events naming this window are ignored.
    pub fn remove_window(&mut self, window_id: WindowId) -> bool {
        self.closed_windows.insert(window_id);
        let Some(bucket) = self.windows.remove(&window_id) else {
            return false;
        };
        for (group_id, record) in &bucket {
            self.group_windows.remove(group_id);
            for tab_id in record.members.keys() {
                self.locations.remove(tab_id);
            }
        }
        true
    }

    /// The window's groups in tab-strip order, stripped of live ids.
    ///
    /// Groups are ordered by their leftmost member; groups with no recorded
    /// members come last, by group id.
    pub fn snapshot(&self, window_id: WindowId) -> WindowSnapshot {
        let Some(bucket) = self.windows.get(&window_id) else {
            return Vec::new();
        };
        let mut records: Vec<(&GroupId, &GroupRecord)> = bucket.iter().collect();
        records.sort_by_key(|(id, record)| {
            let first = record.first_index();
            (first.is_none(), first, **id)
        });
        records
            .into_iter()
            .map(|(_, record)| record.to_persisted())
            .collect()
    }

    /// Every open window's snapshot, concatenated in window id order.
    pub fn live_snapshot(&self) -> WindowSnapshot {
        self.windows
            .keys()
            .flat_map(|window_id| self.snapshot(*window_id))
            .collect()
    }

    pub fn group(&self, window_id: WindowId, group_id: GroupId) -> Option<&GroupRecord> {
        self.windows.get(&window_id)?.get(&group_id)
    }

    pub fn group_ids(&self, window_id: WindowId) -> Vec<GroupId> {
        self.windows
            .get(&window_id)
            .map(|bucket| bucket.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    /// Where a tab is recorded, if anywhere.
    pub fn locate_tab(&self, tab_id: TabId) -> Option<(WindowId, GroupId)> {
        self.locations.get(&tab_id).copied()
    }

    /// The window a group is recorded in, if anywhere.
    pub fn locate_group(&self, group_id: GroupId) -> Option<WindowId> {
        self.group_windows.get(&group_id).copied()
    }

    pub fn tab_count(&self) -> usize {
        self.locations.len()
    }

    pub fn is_window_closed(&self, window_id: WindowId) -> bool {
        self.closed_windows.contains(&window_id)
    }

    fn relocate_group(&mut self, group_id: GroupId, window_id: WindowId) {
        let from = match self.group_windows.get(&group_id) {
            Some(&from) if from != window_id => from,
            _ => return,
        };
        let Some(mut record) = self
            .windows
            .get_mut(&from)
            .and_then(|bucket| bucket.remove(&group_id))
        else {
            return;
        };
        if let Some(metadata) = record.metadata.as_mut() {
            metadata.window_id = window_id;
        }
        for (tab_id, tab) in record.members.iter_mut() {
            tab.window_id = window_id;
            self.locations.insert(*tab_id, (window_id, group_id));
        }
        self.windows
            .entry(window_id)
            .or_default()
            .insert(group_id, record);
        self.group_windows.insert(group_id, window_id);
    }

    fn detach(&mut self, tab_id: TabId) -> bool {
        let Some((window_id, group_id)) = self.locations.remove(&tab_id) else {
            return false;
        };
        self.windows
            .get_mut(&window_id)
            .and_then(|bucket| bucket.get_mut(&group_id))
            .map(|record| record.members.remove(&tab_id).is_some())
            .unwrap_or(false)
    }
}
