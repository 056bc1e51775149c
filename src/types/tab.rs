use serde::{Deserialize, Serialize};

use super::group::{GroupId, TAB_GROUP_ID_NONE};

/// Host tab identifier, unique within a browser session.
pub type TabId = i32;

/// Host window identifier, unique within a browser session.
pub type WindowId = i32;

/// A tab as reported by the host.
///
/// `id` is absent for tabs the host cannot hand out an id for (app and
/// devtools windows); those are never tracked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    #[serde(default)]
    pub id: Option<TabId>,
    pub window_id: WindowId,
    #[serde(default = "ungrouped")]
    pub group_id: GroupId,
    #[serde(default)]
    pub index: i32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

fn ungrouped() -> GroupId {
    TAB_GROUP_ID_NONE
}

impl Tab {
    /// Whether the host placed this tab in a group.
    pub fn is_grouped(&self) -> bool {
        self.group_id != TAB_GROUP_ID_NONE
    }
}
