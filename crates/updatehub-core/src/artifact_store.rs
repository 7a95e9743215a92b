//! Storage for the single installer artifact.
//!
//! The service manages exactly one binary blob at a fixed path. `replace` is
//! atomic with respect to concurrent readers: new bytes are staged into a
//! temporary file in the same directory and renamed over the final path, so
//! a reader observes either the fully-old or the fully-new artifact, never a
//! truncated one. There is no history — once the rename commits, the prior
//! artifact is gone.
//!
//! Filename and content-type policy belongs to the upload operation; this
//! store takes whatever bytes it is given.

use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::UpdateError;

/// Result of committing a new artifact.
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    /// Size of the committed artifact in bytes.
    pub size: u64,
    /// Final on-disk path of the artifact.
    pub path: PathBuf,
}

/// Store for the installer artifact at a fixed path.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use updatehub_core::artifact_store::ArtifactStore;
///
/// # tokio_test::block_on(async {
/// let dir = tempfile::tempdir().unwrap();
/// let store = ArtifactStore::new(dir.path().join("packages/latest_package.exe"));
///
/// let stored = store.replace(Bytes::from("installer bytes")).await.unwrap();
/// assert_eq!(stored.size, 15);
///
/// let data = store.read().await.unwrap();
/// assert_eq!(data.as_ref(), b"installer bytes");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    /// Create a store over the given artifact path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The fixed on-disk path of the artifact.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether an artifact currently exists.
    pub async fn exists(&self) -> bool {
        tokio::fs::metadata(&self.path).await.is_ok()
    }

    /// Size of the stored artifact in bytes.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::ArtifactMissing`] if no artifact has been uploaded.
    /// - [`UpdateError::Internal`] on other I/O failures.
    pub async fn size(&self) -> Result<u64, UpdateError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(UpdateError::ArtifactMissing),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("failed to stat artifact {}", self.path.display()))
                .into()),
        }
    }

    /// Read the full artifact bytes.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::ArtifactMissing`] if no artifact has been uploaded.
    /// - [`UpdateError::Internal`] on other I/O failures.
    pub async fn read(&self) -> Result<Bytes, UpdateError> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => {
                trace!(path = %self.path.display(), size = data.len(), "read artifact");
                Ok(Bytes::from(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(UpdateError::ArtifactMissing),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("failed to read artifact {}", self.path.display()))
                .into()),
        }
    }

    /// Replace the artifact with new bytes, atomically.
    ///
    /// Stages into a temporary file in the artifact's directory, then renames
    /// over the final path. Creates the directory on first use. The previous
    /// artifact, if any, is destroyed by the rename.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::Internal`] if the directory cannot be created
    /// or the temporary file cannot be created, written, or renamed.
    pub async fn replace(&self, data: Bytes) -> Result<StoredArtifact, UpdateError> {
        let dir = parent_dir(&self.path);
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create package directory {}", dir.display()))?;

        let temp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;

        tokio::fs::write(temp.path(), &data)
            .await
            .with_context(|| format!("failed to write temp file {}", temp.path().display()))?;

        let size = data.len() as u64;
        temp.persist(&self.path)
            .with_context(|| format!("failed to commit artifact {}", self.path.display()))?;

        debug!(path = %self.path.display(), size, "committed new artifact");
        Ok(StoredArtifact {
            size,
            path: self.path.clone(),
        })
    }
}

/// The directory containing `path`, falling back to `.` for bare filenames.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> ArtifactStore {
        ArtifactStore::new(dir.join("packages").join("latest_package.exe"))
    }

    // -----------------------------------------------------------------------
    // Existence and size
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_should_report_missing_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());

        assert!(!store.exists().await);
        assert!(matches!(
            store.size().await,
            Err(UpdateError::ArtifactMissing)
        ));
        assert!(matches!(
            store.read().await,
            Err(UpdateError::ArtifactMissing)
        ));
    }

    #[tokio::test]
    async fn test_should_report_size_after_replace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());

        store
            .replace(Bytes::from(vec![0xAB_u8; 1024]))
            .await
            .expect("replace should succeed");

        assert!(store.exists().await);
        assert_eq!(store.size().await.expect("size"), 1024);
    }

    // -----------------------------------------------------------------------
    // Replace / read round trips
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_should_roundtrip_uploaded_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());

        let payload = Bytes::from_static(b"\x4d\x5a installer payload \x00\x01\x02");
        let stored = store.replace(payload.clone()).await.expect("replace");
        assert_eq!(stored.size, payload.len() as u64);

        let read = store.read().await.expect("read");
        assert_eq!(read, payload);
    }

    #[tokio::test]
    async fn test_should_fully_replace_prior_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());

        // First artifact is larger than the second; no residual bytes may
        // survive the replacement.
        store
            .replace(Bytes::from(vec![b'X'; 4096]))
            .await
            .expect("first replace");
        store
            .replace(Bytes::from_static(b"small"))
            .await
            .expect("second replace");

        let read = store.read().await.expect("read");
        assert_eq!(read.as_ref(), b"small");
        assert_eq!(store.size().await.expect("size"), 5);
    }

    #[tokio::test]
    async fn test_should_create_package_directory_on_first_replace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());
        assert!(!dir.path().join("packages").exists());

        store
            .replace(Bytes::from_static(b"data"))
            .await
            .expect("replace");
        assert!(dir.path().join("packages").is_dir());
    }

    #[tokio::test]
    async fn test_should_leave_no_temp_files_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());

        store
            .replace(Bytes::from_static(b"one"))
            .await
            .expect("replace one");
        store
            .replace(Bytes::from_static(b"two"))
            .await
            .expect("replace two");

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("packages"))
            .expect("read dir")
            .map(|e| e.expect("entry").file_name())
            .collect();
        assert_eq!(
            entries,
            vec![std::ffi::OsString::from("latest_package.exe")]
        );
    }

    // -----------------------------------------------------------------------
    // Concurrent reader during replace
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_should_serve_complete_artifact_to_concurrent_readers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());

        let old = Bytes::from(vec![b'O'; 32 * 1024]);
        let new = Bytes::from(vec![b'N'; 48 * 1024]);
        store.replace(old.clone()).await.expect("seed artifact");

        let reader = store.clone();
        let read_task = tokio::spawn(async move {
            let mut seen = Vec::new();
            for _ in 0..50 {
                seen.push(reader.read().await.expect("read during replace"));
            }
            seen
        });

        let writer = store.clone();
        let new_for_writer = new.clone();
        let write_task = tokio::spawn(async move {
            for _ in 0..10 {
                writer
                    .replace(new_for_writer.clone())
                    .await
                    .expect("replace during reads");
            }
        });

        let (reads, writes) = tokio::join!(read_task, write_task);
        writes.expect("writer task");
        for data in reads.expect("reader task") {
            // Every read observes one of the two complete artifacts.
            assert!(
                data == old || data == new,
                "reader observed a partial artifact ({} bytes)",
                data.len()
            );
        }
    }
}
