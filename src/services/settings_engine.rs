// tabkeeper Settings Engine
// Loads, saves, edits and resets settings. Settings are stored as a JSON file
// at $TABKEEPER_CONFIG or the platform-specific config path.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::KeeperSettings;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "TABKEEPER_CONFIG";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<KeeperSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &KeeperSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &Path;
}

/// Settings engine that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: PathBuf,
    settings: KeeperSettings,
}

impl SettingsEngine {
    /// Uses `path_override` if given, else `$TABKEEPER_CONFIG`, else
    /// `settings.json` in the platform config directory.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        let config_path = path_override
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
            .unwrap_or_else(|| platform::get_config_dir().join("settings.json"));
        Self {
            config_path,
            settings: KeeperSettings::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// A missing file yields defaults; a malformed one is an error.
    fn load(&mut self) -> Result<KeeperSettings, SettingsError> {
        if !self.config_path.exists() {
            self.settings = KeeperSettings::default();
            return Ok(self.settings.clone());
        }
        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            SettingsError::IoError(format!("Failed to read {}: {}", self.config_path.display(), e))
        })?;
        self.settings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }
        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        fs::write(&self.config_path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &KeeperSettings {
        &self.settings
    }

    /// Sets one value by dot path (`"restoration.enabled"`), validates the
    /// result against the settings types, and saves.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() || key.split('.').any(str::is_empty) {
            return Err(SettingsError::InvalidKey(format!("Malformed key '{}'", key)));
        }

        let mut tree = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        let pointer = format!("/{}", key.replace('.', "/"));
        let slot = tree.pointer_mut(&pointer).ok_or_else(|| {
            SettingsError::InvalidKey(format!("Key '{}' not found in settings", key))
        })?;
        *slot = value;

        self.settings = serde_json::from_value(tree).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = KeeperSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
