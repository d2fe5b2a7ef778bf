//! Utilities for loading RON files and watching directories for changes.
//!
//! This module provides a small helper for reading RON files from disk
//! and a simple filesystem watcher resource that sets a shared boolean
//! when files change. The watcher is used for hot-reloading the settings
//! and block definitions while the placer is running.

use bevy::log::{debug, warn};
use bevy::prelude::Resource;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Resource)]
/// File-watcher resource for RON hot-reload.
pub struct RonWatcher {
    pub changed: Arc<Mutex<bool>>, // Shared boolean set to `true` when watched files change.
    _watcher: Option<notify::RecommendedWatcher>, // watcher handle kept to prevent immediate drop.
}

impl RonWatcher {
    /// Create a stub `RonWatcher` that does not have an active OS watcher.
    ///
    /// # Return
    /// Returns a `RonWatcher` with `changed` initialized to `false` and
    /// no underlying OS watcher. Useful as a fallback when watcher
    /// creation fails or when running headless in tests.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(Mutex::new(false)),
            _watcher: None,
        }
    }

    /// Read and clear the changed flag. A poisoned lock is recovered.
    pub fn take_changed(&self) -> bool {
        let mut flag = self.changed.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *flag)
    }

    pub fn mark_changed(&self) {
        *self.changed.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// # Arguments
/// * `path` - Directory path to scan for `.ron` files.
///
/// # Return
/// A `Vec<T>` containing all successfully deserialized items found in
/// the directory, in file name order. Files that fail to parse are skipped
/// and a warning is logged.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &str) -> Vec<T> {
    let mut items = Vec::new();

    let Ok(entries) = std::fs::read_dir(path) else {
        debug!("No RON directory at {path}");
        return items;
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();

    for file in files {
        match std::fs::read_to_string(&file) {
            Ok(content) => match ron::from_str::<T>(&content) {
                Ok(item) => items.push(item),
                Err(e) => warn!("Failed to parse {}: {e}", file.display()),
            },
            Err(e) => warn!("Failed to read {}: {e}", file.display()),
        }
    }

    items
}

/// Create a `RonWatcher` that watches a directory for modifications.
///
/// # Arguments
/// * `path` - Directory path to watch for `.ron` file changes.
///
/// # Return
/// Returns a `RonWatcher` on success. The returned watcher's `changed`
/// flag will be set to `true` when a file modification event under the
/// watched directory is observed.
///
/// # Errors
/// Returns a `notify::Error` if the underlying file-watcher cannot be
/// created or the watcher cannot be registered for the provided path.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(Mutex::new(false));
    let changed_clone = changed.clone();
    // Resolve watched path to a canonical form if possible so we can filter events
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    let p_canon = std::fs::canonicalize(p).unwrap_or_else(|_| p.clone());
                    p_canon.starts_with(&watched_path)
                });
                if relevant {
                    *changed_clone.lock().unwrap_or_else(PoisonError::into_inner) = true;
                }
            }
            Err(e) => warn!("Watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_flag_is_taken_once() {
        let watcher = RonWatcher::stub();
        assert!(!watcher.take_changed());
        watcher.mark_changed();
        assert!(watcher.take_changed());
        assert!(!watcher.take_changed());
    }

    #[test]
    fn unreadable_directory_yields_nothing() {
        let items: Vec<u32> = load_ron_files("does/not/exist");
        assert!(items.is_empty());
    }
}
