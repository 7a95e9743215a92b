//! The UpdateHub operation provider.
//!
//! [`UpdateHub`] composes the version store and the artifact store into the
//! three service operations: compare, download, and upload. The HTTP layer
//! authenticates and routes; everything below the gate lives here.

use anyhow::Context;
use bytes::Bytes;
use tracing::{info, warn};

use crate::artifact_store::ArtifactStore;
use crate::config::{ACCEPTED_EXTENSION, DOWNLOAD_FILE_NAME, UpdateHubConfig};
use crate::error::UpdateError;
use crate::model::{ArtifactDownload, CODE_OUTDATED, CODE_UP_TO_DATE, CompareOutput, UploadOutput};
use crate::version::Version;
use crate::version_store::VersionStore;

/// The business-logic provider for the UpdateHub service.
///
/// Cheap to clone; each clone shares the same on-disk state. Safe to use
/// from concurrently running requests: both stores commit via
/// stage-then-atomic-rename, so readers never observe partial writes.
#[derive(Debug, Clone)]
pub struct UpdateHub {
    config: UpdateHubConfig,
    versions: VersionStore,
    artifacts: ArtifactStore,
}

impl UpdateHub {
    /// Create a provider from configuration.
    ///
    /// # Errors
    ///
    /// Fails if `config.default_version` is not a valid version string.
    pub fn new(config: UpdateHubConfig) -> anyhow::Result<Self> {
        let default: Version = config
            .default_version
            .parse()
            .with_context(|| format!("invalid default version: {}", config.default_version))?;

        let versions = VersionStore::new(config.version_file_path(), default);
        let artifacts = ArtifactStore::new(config.artifact_path());

        Ok(Self {
            config,
            versions,
            artifacts,
        })
    }

    /// The configuration this provider was built from.
    #[must_use]
    pub fn config(&self) -> &UpdateHubConfig {
        &self.config
    }

    /// The current version, initializing default state if necessary.
    pub async fn current_version(&self) -> Version {
        self.versions.load().await.into_version()
    }

    /// Compare a client's version against the stored current version.
    ///
    /// Three outcomes:
    /// - equal: the client is up to date, nothing changes;
    /// - client is newer: the client's version becomes the new baseline
    ///   (persisted before responding) and the response carries
    ///   `updated: true`;
    /// - client is older: the client is told the latest version; nothing
    ///   changes.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::InvalidVersionFormat`] if `input` is not a valid
    ///   version string.
    /// - [`UpdateError::Internal`] if persisting a newer baseline fails.
    pub async fn compare_version(&self, input: &str) -> Result<CompareOutput, UpdateError> {
        let input_version: Version = input.parse()?;

        let read = self.versions.load().await;
        if read.is_recovered() {
            warn!("version state was missing or corrupt; proceeding from default");
        }
        let latest = read.into_version();

        match latest.compare(&input_version) {
            std::cmp::Ordering::Equal => {
                info!(input = %input_version, latest = %latest, "compare: client is current");
                Ok(CompareOutput {
                    code: CODE_UP_TO_DATE,
                    message: String::from("Current version is up to date"),
                    input_version: input_version.as_str().to_owned(),
                    latest_version: latest.as_str().to_owned(),
                    updated: None,
                })
            }
            std::cmp::Ordering::Less => {
                // The client runs a newer build than we have on record; adopt
                // it as the new baseline before answering.
                self.versions.store(&input_version).await?;
                info!(
                    old = %latest,
                    new = %input_version,
                    "compare: adopted newer client version as baseline"
                );
                Ok(CompareOutput {
                    code: CODE_UP_TO_DATE,
                    message: String::from("Current version is up to date"),
                    input_version: input_version.as_str().to_owned(),
                    latest_version: input_version.as_str().to_owned(),
                    updated: Some(true),
                })
            }
            std::cmp::Ordering::Greater => {
                info!(input = %input_version, latest = %latest, "compare: client is outdated");
                Ok(CompareOutput {
                    code: CODE_OUTDATED,
                    message: format!("The latest version is {latest}, please update"),
                    input_version: input_version.as_str().to_owned(),
                    latest_version: latest.as_str().to_owned(),
                    updated: None,
                })
            }
        }
    }

    /// Fetch the installer package for download.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::ArtifactMissing`] if no package has been uploaded.
    /// - [`UpdateError::Internal`] on storage failures.
    pub async fn download_latest(&self) -> Result<ArtifactDownload, UpdateError> {
        let data = self.artifacts.read().await?;
        let size = data.len() as u64;
        info!(size, "serving installer package");

        Ok(ArtifactDownload {
            data,
            size,
            file_name: String::from(DOWNLOAD_FILE_NAME),
        })
    }

    /// Accept an uploaded installer package, replacing any prior one.
    ///
    /// Policy checks run before storage is touched: the filename must be
    /// non-empty and carry the accepted extension. The upload endpoint's
    /// "file part present" check happens in the HTTP layer, where the
    /// multipart body is parsed.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::EmptyFilename`] if the file part has no name.
    /// - [`UpdateError::UnsupportedType`] if the extension is not accepted.
    /// - [`UpdateError::Internal`] if committing the package fails.
    pub async fn upload_package(
        &self,
        file_name: &str,
        data: Bytes,
    ) -> Result<UploadOutput, UpdateError> {
        if file_name.is_empty() {
            return Err(UpdateError::EmptyFilename);
        }
        if !file_name.ends_with(ACCEPTED_EXTENSION) {
            return Err(UpdateError::UnsupportedType {
                filename: file_name.to_owned(),
            });
        }

        let stored = self.artifacts.replace(data).await?;
        info!(size = stored.size, "installer package replaced");

        Ok(UploadOutput {
            status: String::from("success"),
            message: String::from("Package uploaded successfully"),
            file_size: stored.size,
            file_path: UpdateHubConfig::artifact_logical_path(),
        })
    }
}
