use std::fmt;

use serde::{Deserialize, Serialize};

use super::tab::WindowId;

/// Host tab-group identifier, unique within a browser session.
pub type GroupId = i32;

/// Group id the host reports for tabs that are not in any group.
pub const TAB_GROUP_ID_NONE: GroupId = -1;

/// The fixed palette a tab group can be drawn in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
}

impl Color {
    pub const ALL: [Color; 8] = [
        Color::Grey,
        Color::Blue,
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::Pink,
        Color::Purple,
        Color::Cyan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Grey => "grey",
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Pink => "pink",
            Color::Purple => "purple",
            Color::Cyan => "cyan",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tab group as reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TabGroup {
    pub id: GroupId,
    pub window_id: WindowId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub collapsed: bool,
}

/// Group-level facts kept alongside the group's member tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMetadata {
    pub title: Option<String>,
    pub color: Color,
    pub window_id: WindowId,
    pub collapsed: bool,
}

impl From<&TabGroup> for GroupMetadata {
    fn from(group: &TabGroup) -> Self {
        Self {
            title: group.title.clone(),
            color: group.color,
            window_id: group.window_id,
            collapsed: group.collapsed,
        }
    }
}

/// Properties applied to a regrouped set of tabs. Unset fields are left alone
/// by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GroupUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}
