//! The host browser's tab and tab-group commands, as the rest of the crate
//! sees them.

use async_trait::async_trait;

use crate::types::errors::HostError;
use crate::types::group::{GroupId, GroupUpdate, TabGroup};
use crate::types::tab::{Tab, TabId};

/// Commands the host tab/group subsystem accepts.
///
/// Every call is an independent asynchronous request; nothing here retries
/// or times out.
#[async_trait]
pub trait BrowserHost: Send + Sync {
    /// All tab groups in all windows.
    async fn query_groups(&self) -> Result<Vec<TabGroup>, HostError>;
    /// All tabs in all windows.
    async fn query_tabs(&self) -> Result<Vec<Tab>, HostError>;
    /// Opens a tab; `None` opens the default new-tab page.
    async fn create_tab(&self, url: Option<&str>) -> Result<Tab, HostError>;
    /// Puts the tabs into one new group and returns its id.
    async fn group_tabs(&self, tab_ids: &[TabId]) -> Result<GroupId, HostError>;
    async fn update_group(&self, group_id: GroupId, update: &GroupUpdate) -> Result<(), HostError>;
}
