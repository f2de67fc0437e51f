// On-disk snapshot cache
//
// The whole snapshot is rewritten on every save. There is no locking: two
// processes saving at once means the last writer wins.

use crate::error::{Result, WorkspaceError};
use crate::store::models::{ConfigSnapshot, CACHE_VERSION};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct ConfigStore {
    path: PathBuf,
    workspace_root: PathBuf,
}

impl ConfigStore {
    /// `workspace_root` is the root this store serves; snapshots saved for a
    /// different root are rejected on load.
    pub fn new(path: PathBuf, workspace_root: PathBuf) -> Self {
        Self {
            path,
            workspace_root,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write the full snapshot, replacing whatever was there
    ///
    /// The JSON goes to a sibling temp file first and is renamed over the
    /// cache, so readers never see half a file.
    pub fn save(&self, snapshot: &ConfigSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = serde_json::to_string_pretty(snapshot)?;
        content.push('\n');

        let tmp_path = self.path.with_extension("json.tmp");
        let written =
            fs::write(&tmp_path, content).and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            // Don't leave a partial temp file next to the cache
            if tmp_path.is_file() {
                let _ = fs::remove_file(&tmp_path);
            }
            return Err(e.into());
        }

        debug!(
            path = %self.path.display(),
            projects = snapshot.projects.len(),
            "saved project cache"
        );
        Ok(())
    }

    /// Read and validate the snapshot, reporting exactly what went wrong
    pub fn try_load(&self) -> Result<ConfigSnapshot> {
        let content = fs::read(&self.path)?;
        let snapshot: ConfigSnapshot = serde_json::from_slice(&content)?;

        if snapshot.version != CACHE_VERSION {
            return Err(WorkspaceError::CacheVersion {
                found: snapshot.version,
                expected: CACHE_VERSION.to_string(),
            });
        }

        if !same_directory(&snapshot.workspace_root, &self.workspace_root) {
            return Err(WorkspaceError::CacheWorkspaceMismatch {
                cached: snapshot.workspace_root.display().to_string(),
                current: self.workspace_root.display().to_string(),
            });
        }

        Ok(snapshot)
    }

    /// Read the snapshot, or `None` with a warning if it can't be used
    ///
    /// Never fails; callers decide how to recover (normally by running a
    /// fresh discovery pass).
    pub fn load(&self) -> Option<ConfigSnapshot> {
        match self.try_load() {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    "Could not load project config: {}",
                    e.user_message()
                );
                None
            }
        }
    }
}

/// Equal paths, or two spellings (symlink, `..`) of one existing directory
fn same_directory(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
