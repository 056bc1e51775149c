//! Host bridge for the tabkeeper background process.
//!
//! The host speaks newline-delimited JSON over the process's stdin/stdout.
//!
//! Outbound: `{"event":"ready","version":"..."}` once, then commands
//! `{"id":1,"method":"tabs.create","params":{"url":"..."}}`.
//!
//! Inbound: browser events `{"event":"tabCreated","tab":{...}}`, or command
//! responses `{"id":1,"result":{...}}` / `{"id":1,"error":"..."}`.
//!
//! [`StdioHost`] implements [`BrowserHost`] by matching responses to
//! commands by id; [`route_inbound`] feeds it and forwards events.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::services::host::BrowserHost;
use crate::types::errors::{BridgeError, HostError};
use crate::types::event::BrowserEvent;
use crate::types::group::{GroupId, GroupUpdate, TabGroup};
use crate::types::tab::{Tab, TabId};

pub const METHOD_QUERY_GROUPS: &str = "tabGroups.query";
pub const METHOD_QUERY_TABS: &str = "tabs.query";
pub const METHOD_CREATE_TAB: &str = "tabs.create";
pub const METHOD_GROUP_TABS: &str = "tabs.group";
pub const METHOD_UPDATE_GROUP: &str = "tabGroups.update";

/// One decoded inbound line.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Event(BrowserEvent),
    Response { id: u64, outcome: Result<Value, String> },
}

/// Decodes one inbound line.
pub fn parse_line(line: &str) -> Result<InboundMessage, BridgeError> {
    let value: Value = serde_json::from_str(line).map_err(|e| BridgeError::Parse(e.to_string()))?;

    if value.get("event").is_some() {
        let event = serde_json::from_value(value)
            .map_err(|e| BridgeError::UnknownMessage(e.to_string()))?;
        return Ok(InboundMessage::Event(event));
    }

    if let Some(id) = value.get("id").and_then(Value::as_u64) {
        let outcome = match value.get("error").filter(|e| !e.is_null()) {
            Some(Value::String(message)) => Err(message.clone()),
            Some(other) => Err(other.to_string()),
            None => Ok(value.get("result").cloned().unwrap_or(Value::Null)),
        };
        return Ok(InboundMessage::Response { id, outcome });
    }

    let preview: String = line.chars().take(200).collect();
    Err(BridgeError::UnknownMessage(preview))
}

type Responder = oneshot::Sender<Result<Value, String>>;

/// [`BrowserHost`] over a line-oriented writer, answered through
/// [`StdioHost::resolve`].
pub struct StdioHost {
    out: tokio::sync::Mutex<Box<dyn AsyncWrite + Send + Unpin>>,
    pending: Mutex<HashMap<u64, Responder>>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl StdioHost {
    pub fn new<W>(out: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            out: tokio::sync::Mutex::new(Box::new(out)),
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Tells the host the process is up.
    pub async fn announce_ready(&self) -> Result<(), HostError> {
        self.write_line(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}))
            .await
    }

    /// Sends a command and waits for its response.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, HostError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = oneshot::channel();
        self.lock_pending().insert(id, tx);
        if self.closed.load(Ordering::Acquire) {
            self.lock_pending().remove(&id);
            return Err(HostError::Disconnected);
        }

        let request = json!({"id": id, "method": method, "params": params});
        if let Err(e) = self.write_line(&request).await {
            self.lock_pending().remove(&id);
            return Err(e);
        }
        debug!(id, method, "host command sent");

        match rx.await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(message)) => Err(HostError::CommandFailed {
                method: method.to_string(),
                message,
            }),
            Err(_) => Err(HostError::Disconnected),
        }
    }

    /// Completes the command with this id. Returns `false` for unknown ids.
    pub fn resolve(&self, id: u64, outcome: Result<Value, String>) -> bool {
        match self.lock_pending().remove(&id) {
            // The caller may have given up; that is not our concern.
            Some(tx) => {
                let _ = tx.send(outcome);
                true
            }
            None => false,
        }
    }

    /// Fails every outstanding and future command with `Disconnected`.
    pub fn disconnect(&self) {
        self.closed.store(true, Ordering::Release);
        self.lock_pending().clear();
    }

    pub fn pending_count(&self) -> usize {
        self.lock_pending().len()
    }

    async fn call_as<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, HostError> {
        let result = self.call(method, params).await?;
        serde_json::from_value(result).map_err(|e| HostError::MalformedResponse {
            method: method.to_string(),
            message: e.to_string(),
        })
    }

    async fn write_line(&self, value: &Value) -> Result<(), HostError> {
        let mut line = value.to_string();
        line.push('\n');
        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes())
            .await
            .map_err(|e| HostError::Io(e.to_string()))?;
        out.flush().await.map_err(|e| HostError::Io(e.to_string()))
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<u64, Responder>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl BrowserHost for StdioHost {
    async fn query_groups(&self) -> Result<Vec<TabGroup>, HostError> {
        self.call_as(METHOD_QUERY_GROUPS, json!({})).await
    }

    async fn query_tabs(&self) -> Result<Vec<Tab>, HostError> {
        self.call_as(METHOD_QUERY_TABS, json!({})).await
    }

    async fn create_tab(&self, url: Option<&str>) -> Result<Tab, HostError> {
        let mut params = Map::new();
        if let Some(url) = url {
            params.insert("url".to_string(), Value::String(url.to_string()));
        }
        self.call_as(METHOD_CREATE_TAB, Value::Object(params)).await
    }

    async fn group_tabs(&self, tab_ids: &[TabId]) -> Result<GroupId, HostError> {
        self.call_as(METHOD_GROUP_TABS, json!({"tabIds": tab_ids})).await
    }

    async fn update_group(&self, group_id: GroupId, update: &GroupUpdate) -> Result<(), HostError> {
        self.call(METHOD_UPDATE_GROUP, json!({"groupId": group_id, "update": update}))
            .await
            .map(|_| ())
    }
}

/// Reads inbound lines until EOF: responses complete their commands, events
/// go to `events`. Undecodable lines are logged and skipped. On return every
/// outstanding command has failed with `Disconnected`.
pub async fn route_inbound<R>(
    reader: R,
    host: Arc<StdioHost>,
    events: mpsc::UnboundedSender<BrowserEvent>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let result = loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Ok(InboundMessage::Event(event)) => {
                if events.send(event).is_err() {
                    debug!("event consumer gone; stopping bridge");
                    break Ok(());
                }
            }
            Ok(InboundMessage::Response { id, outcome }) => {
                if !host.resolve(id, outcome) {
                    warn!(id, "response for unknown command");
                }
            }
            Err(e) => warn!(error = %e, "skipping bridge line"),
        }
    };
    host.disconnect();
    result
}
