use serde::{Deserialize, Serialize};

use super::group::TabGroup;
use super::tab::{Tab, TabId, WindowId};

/// Receiver of host change notifications, one method per event kind.
///
/// Group events and tab events arrive on independent streams with no ordering
/// between them, so implementations must accept a tab for a group they have
/// not seen yet and a group removal that precedes its tabs' removals.
///
/// When a window closes the host reports each of its tabs as removed with
/// `is_window_closing` set, and only then the window itself.
pub trait BrowserEventHandler {
    fn on_group_created(&mut self, group: TabGroup);
    fn on_group_updated(&mut self, group: TabGroup);
    fn on_group_removed(&mut self, group: TabGroup);
    fn on_tab_created(&mut self, tab: Tab);
    fn on_tab_updated(&mut self, tab: Tab);
    fn on_tab_removed(&mut self, tab_id: TabId, window_id: WindowId, is_window_closing: bool);
    fn on_window_removed(&mut self, window_id: WindowId);
}

/// A host change notification as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum BrowserEvent {
    GroupCreated { group: TabGroup },
    GroupUpdated { group: TabGroup },
    GroupRemoved { group: TabGroup },
    TabCreated { tab: Tab },
    TabUpdated { tab: Tab },
    #[serde(rename_all = "camelCase")]
    TabRemoved {
        tab_id: TabId,
        window_id: WindowId,
        #[serde(default)]
        is_window_closing: bool,
    },
    #[serde(rename_all = "camelCase")]
    WindowRemoved { window_id: WindowId },
}

impl BrowserEvent {
    /// Routes the event to the matching handler method.
    pub fn dispatch<H: BrowserEventHandler + ?Sized>(self, handler: &mut H) {
        match self {
            BrowserEvent::GroupCreated { group } => handler.on_group_created(group),
            BrowserEvent::GroupUpdated { group } => handler.on_group_updated(group),
            BrowserEvent::GroupRemoved { group } => handler.on_group_removed(group),
            BrowserEvent::TabCreated { tab } => handler.on_tab_created(tab),
            BrowserEvent::TabUpdated { tab } => handler.on_tab_updated(tab),
            BrowserEvent::TabRemoved {
                tab_id,
                window_id,
                is_window_closing,
            } => handler.on_tab_removed(tab_id, window_id, is_window_closing),
            BrowserEvent::WindowRemoved { window_id } => handler.on_window_removed(window_id),
        }
    }

    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            BrowserEvent::GroupCreated { .. } => "groupCreated",
            BrowserEvent::GroupUpdated { .. } => "groupUpdated",
            BrowserEvent::GroupRemoved { .. } => "groupRemoved",
            BrowserEvent::TabCreated { .. } => "tabCreated",
            BrowserEvent::TabUpdated { .. } => "tabUpdated",
            BrowserEvent::TabRemoved { .. } => "tabRemoved",
            BrowserEvent::WindowRemoved { .. } => "windowRemoved",
        }
    }
}
