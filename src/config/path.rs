//! Module for searching for xone-poll config files

use std::path::PathBuf;

/// Name of the config file inside the config directories
const CONFIG_FILE: &str = "config.yaml";

/// Returns the path to the user's config file (e.g. "~/.config/xone-poll/config.yaml")
/// if one exists.
pub fn get_config_path() -> Option<PathBuf> {
    let Ok(base_dirs) = xdg::BaseDirectories::with_prefix("xone-poll") else {
        log::warn!("Unable to determine config base path.");
        return None;
    };

    base_dirs.find_config_file(CONFIG_FILE)
}
