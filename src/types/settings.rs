use serde::{Deserialize, Serialize};

/// Top-level settings container, stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct KeeperSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub restoration: RestorationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which key-value backend holds saved layouts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    /// SQLite file. Defaults to `tabkeeper.db` in the platform data dir.
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestorationSettings {
    /// Replay saved layouts on startup.
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Also replay the live `"current"` layout. It only holds groups when the
    /// previous run ended without its windows closing (a crash).
    #[serde(default = "enabled")]
    pub restore_live_snapshot: bool,
}

impl Default for RestorationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            restore_live_snapshot: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn enabled() -> bool {
    true
}

fn default_filter() -> String {
    "info".to_string()
}
