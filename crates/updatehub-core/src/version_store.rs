//! Durable storage for the current-version pointer.
//!
//! The current version lives in a single-line text file. Reads are
//! self-repairing: a missing or corrupt file is re-initialized with the
//! configured default and the outcome is reported as
//! [`VersionRead::Recovered`], so callers and tests can tell a healthy read
//! from a repaired one while compare requests keep getting answered.
//!
//! Writes stage the new value into a temporary file in the same directory
//! and rename it over the final path, so a concurrent reader sees either the
//! old version string or the new one, never a partial write.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::error::UpdateError;
use crate::version::Version;

/// Outcome of loading the current version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRead {
    /// The state file existed and held a valid version.
    Current(Version),
    /// The state file was missing or unreadable; the default was written
    /// back and is now the current version.
    Recovered(Version),
}

impl VersionRead {
    /// The version, regardless of how it was obtained.
    #[must_use]
    pub fn into_version(self) -> Version {
        match self {
            Self::Current(v) | Self::Recovered(v) => v,
        }
    }

    /// Whether this read repaired missing or corrupt state.
    #[must_use]
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }
}

/// Store for the process-wide current version.
#[derive(Debug, Clone)]
pub struct VersionStore {
    path: PathBuf,
    default: Version,
}

impl VersionStore {
    /// Create a store over the given state file with the given default.
    #[must_use]
    pub fn new(path: PathBuf, default: Version) -> Self {
        Self { path, default }
    }

    /// Load the current version, repairing missing or corrupt state.
    ///
    /// This never fails visibly: any read problem falls back to the default,
    /// which is persisted back before returning. If even that write fails
    /// (e.g. a read-only disk) the default is still returned so comparison
    /// requests keep being answered; the write failure is logged.
    pub async fn load(&self) -> VersionRead {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => match text.trim().parse::<Version>() {
                Ok(version) => {
                    debug!(version = %version, "loaded current version");
                    VersionRead::Current(version)
                }
                Err(_) => {
                    warn!(
                        path = %self.path.display(),
                        content = text.trim(),
                        "version file is corrupt, re-initializing"
                    );
                    self.repair().await
                }
            },
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), error = %e, "version file unreadable, re-initializing");
                }
                self.repair().await
            }
        }
    }

    /// Persist a new current version atomically.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::Internal`] if the temporary file cannot be
    /// created, written, or renamed into place.
    pub async fn store(&self, version: &Version) -> Result<(), UpdateError> {
        let dir = parent_dir(&self.path);
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create state directory {}", dir.display()))?;

        let temp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;

        tokio::fs::write(temp.path(), version.as_str())
            .await
            .with_context(|| format!("failed to write temp file {}", temp.path().display()))?;

        temp.persist(&self.path)
            .with_context(|| format!("failed to commit version file {}", self.path.display()))?;

        debug!(version = %version, path = %self.path.display(), "persisted current version");
        Ok(())
    }

    /// Write the default back and report a recovered read.
    async fn repair(&self) -> VersionRead {
        if let Err(e) = self.store(&self.default).await {
            warn!(error = %e, "could not persist default version during repair");
        } else {
            info!(default = %self.default, "initialized version state with default");
        }
        VersionRead::Recovered(self.default.clone())
    }
}

/// The directory containing `path`, falling back to `.` for bare filenames.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
