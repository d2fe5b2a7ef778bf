//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If multiple
//! RON files are present, the first successfully parsed `Settings` (by file name)
//! is used. If no RON files are found or if no parsing succeeds, default settings
//! are used. Whatever is loaded goes through `Settings::validated`.
use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use crate::settings::Settings;
use bevy::log::{info, warn};
use bevy::prelude::{Res, ResMut, Resource};

/// Directory settings are read from.
pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher(pub crate::ron::RonWatcher);

/// Load settings from `path` (directory).
///
/// # Returns
/// The first successfully parsed `Settings`, validated, or the defaults if
/// no valid RON files are found.
///
/// # Example
/// ```ignore
/// let settings = load_settings_from_dir("data/settings");
/// ```
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    if let Some(first) = items.into_iter().next() {
        info!("Loaded settings from {path}");
        first.validated()
    } else {
        warn!("No usable settings in {path}, using defaults");
        Settings::defaults().validated()
    }
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns a `notify::Error` if the directory cannot be watched.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(SettingsWatcher)
}

/// Check for changes and reload the settings resource when files change.
///
/// Rebinding the control mode and switching placement off is left to
/// `placement::systems::sync_control_mode`, which reacts to the change.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if watcher.0.take_changed() {
        info!("Settings changed, reloading...");
        *settings = load_settings_from_dir(SETTINGS_DIR);
    }
}

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher(crate::ron::RonWatcher::stub())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlMode;

    #[test]
    fn shipped_settings_parse() {
        let settings = load_settings_from_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/data/settings"));
        assert_eq!(settings.placement.control_mode, ControlMode::ToggleForwardBack);
        assert!(settings.placement.auto_repeat);
    }

    #[test]
    fn missing_directory_falls_back_to_defaults() {
        assert_eq!(load_settings_from_dir("does/not/exist"), Settings::defaults().validated());
    }
}
