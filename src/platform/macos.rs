// tabkeeper platform paths for macOS
// Config and data: ~/Library/Application Support/TabKeeper

use std::path::PathBuf;

fn app_support(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    PathBuf::from(env("HOME").unwrap_or_else(|| String::from("/tmp")))
        .join("Library")
        .join("Application Support")
        .join("TabKeeper")
}

pub fn config_dir(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    app_support(env)
}

pub fn data_dir(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    app_support(env)
}
