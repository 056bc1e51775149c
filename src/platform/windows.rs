// tabkeeper platform paths for Windows
// Config and data: %APPDATA%/TabKeeper

use std::path::PathBuf;

fn app_data(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    let appdata =
        env("APPDATA").unwrap_or_else(|| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("TabKeeper")
}

pub fn config_dir(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    app_data(env)
}

pub fn data_dir(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    app_data(env)
}
