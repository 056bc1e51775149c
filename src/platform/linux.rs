// tabkeeper platform paths for Linux
// Config: ~/.config/tabkeeper
// Data:   ~/.local/share/tabkeeper

use std::path::PathBuf;

const APP_DIR: &str = "tabkeeper";

fn home(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    PathBuf::from(env("HOME").unwrap_or_else(|| String::from("/tmp")))
}

pub fn config_dir(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    match env("XDG_CONFIG_HOME") {
        Some(xdg) => PathBuf::from(xdg).join(APP_DIR),
        None => home(env).join(".config").join(APP_DIR),
    }
}

pub fn data_dir(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    match env("XDG_DATA_HOME") {
        Some(xdg) => PathBuf::from(xdg).join(APP_DIR),
        None => home(env).join(".local").join("share").join(APP_DIR),
    }
}
