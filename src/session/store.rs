//! File-backed persistence of quiz [`Progress`].

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    foundation::error::{EmbraceError, EmbraceResult},
    session::progress::Progress,
};

/// Progress persisted as JSON at a fixed path.
///
/// A sibling `<name>.reset` marker requests a one-shot reset: the next [`ProgressStore::load`]
/// consumes the marker and starts over.
#[derive(Clone, Debug)]
pub struct ProgressStore {
    path: PathBuf,
    reset_marker: PathBuf,
}

impl ProgressStore {
    /// Store progress at `path`; the reset marker sits next to it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut marker = path.clone().into_os_string();
        marker.push(".reset");
        Self {
            path,
            reset_marker: PathBuf::from(marker),
        }
    }

    /// Progress file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Force-reset marker file.
    pub fn reset_marker(&self) -> &Path {
        &self.reset_marker
    }

    /// Never fails: absent, unreadable or invalid state yields the initial progress. An invalid
    /// file is removed so it cannot shadow later saves.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Progress {
        if self.reset_marker.exists() {
            tracing::debug!("force reset requested");
            if let Err(e) = remove_if_present(&self.reset_marker) {
                tracing::warn!(error = %e, "could not remove reset marker");
            }
            if let Err(e) = self.clear() {
                tracing::warn!(error = %e, "could not clear progress");
            }
            return Progress::default();
        }

        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Progress::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read progress");
                return Progress::default();
            }
        };

        let parsed = serde_json::from_slice::<Progress>(&bytes)
            .map_err(|e| EmbraceError::serde(format!("parse progress: {e}")))
            .and_then(|p| p.validate().map(|()| p));
        match parsed {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "discarding invalid progress");
                if let Err(e) = self.clear() {
                    tracing::warn!(error = %e, "could not remove invalid progress");
                }
                Progress::default()
            }
        }
    }

    /// Write `progress` as pretty JSON, creating the parent directory.
    pub fn save(&self, progress: &Progress) -> EmbraceResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                EmbraceError::persistence(format!("create '{}': {e}", dir.display()))
            })?;
        }
        let json = serde_json::to_vec_pretty(progress)
            .map_err(|e| EmbraceError::serde(format!("serialize progress: {e}")))?;
        fs::write(&self.path, json).map_err(|e| {
            EmbraceError::persistence(format!("write '{}': {e}", self.path.display()))
        })
    }

    /// Remove persisted progress. Clearing an absent file is fine.
    pub fn clear(&self) -> EmbraceResult<()> {
        remove_if_present(&self.path)
    }

    /// Ask the next [`ProgressStore::load`] to start over.
    pub fn set_force_reset(&self) -> EmbraceResult<()> {
        fs::write(&self.reset_marker, b"1").map_err(|e| {
            EmbraceError::persistence(format!(
                "write '{}': {e}",
                self.reset_marker.display()
            ))
        })
    }
}

fn remove_if_present(path: &Path) -> EmbraceResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(EmbraceError::persistence(format!(
            "remove '{}': {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/store.rs"]
mod tests;
