//! File-backed [`SessionStore`]: one JSON record in the app data dir.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use glowauth_session::Session;

use crate::{SessionStore, StoreError};

/// The fixed, process-wide key the session record is stored under.
/// On disk this becomes the file name `user.json`.
pub const STORAGE_KEY: &str = "user";

/// A [`SessionStore`] backed by a single JSON file.
///
/// The whole record is rewritten on every save — it's a handful of
/// bytes, so there is nothing to gain from partial updates. Reads
/// tolerate every failure mode: a missing file, an unreadable file,
/// and a file that no longer parses as a session record all load as
/// "no session".
pub struct FileSessionStore {
    /// Full path of the record file (`<dir>/user.json`).
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store keeping its record inside the given directory.
    ///
    /// The directory doesn't need to exist yet — it's created on the
    /// first save.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Creates a store in the platform's per-user data directory
    /// (XDG data dir on Linux, `Application Support` on macOS,
    /// `AppData` on Windows).
    ///
    /// Returns `None` when no home directory can be determined for the
    /// current user — callers should fall back to an explicit path.
    pub fn open_default() -> Option<Self> {
        let dirs = ProjectDirs::from("com", "glowup", "glowauth")?;
        Some(Self::at(dirs.data_local_dir()))
    }

    /// The full path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    async fn load(&self) -> Option<Session> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stored session");
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to read stored session, treating as signed out"
                );
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "stored session record is corrupt, treating as signed out"
                );
                None
            }
        }
    }

    async fn save(&self, session: Option<&Session>) -> Result<(), StoreError> {
        match session {
            Some(session) => {
                let bytes = serde_json::to_vec(session)?;
                if let Some(parent) = self.path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(&self.path, bytes).await?;
                tracing::debug!(path = %self.path.display(), "session record written");
                Ok(())
            }
            None => match tokio::fs::remove_file(&self.path).await {
                Ok(()) => {
                    tracing::debug!(path = %self.path.display(), "session record deleted");
                    Ok(())
                }
                // Deleting an absent record is the normal signed-out case.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            },
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
