// tabkeeper platform abstraction
// Locates the per-user config and data directories on Windows, macOS and Linux.
//
// Uses `cfg(target_os)` to select the implementation at compile time. Each
// implementation resolves paths from an environment lookup function so the
// rules can be tested without touching the process environment.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
use linux as imp;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
use macos as imp;

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
use windows as imp;

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Where `settings.json` lives.
///
/// - **Linux**: `$XDG_CONFIG_HOME/tabkeeper` or `~/.config/tabkeeper`
/// - **macOS**: `~/Library/Application Support/TabKeeper`
/// - **Windows**: `%APPDATA%/TabKeeper`
pub fn get_config_dir() -> PathBuf {
    imp::config_dir(env_lookup)
}

/// Where the snapshot database lives.
///
/// - **Linux**: `$XDG_DATA_HOME/tabkeeper` or `~/.local/share/tabkeeper`
/// - **macOS**: `~/Library/Application Support/TabKeeper`
/// - **Windows**: `%APPDATA%/TabKeeper`
pub fn get_data_dir() -> PathBuf {
    imp::data_dir(env_lookup)
}
