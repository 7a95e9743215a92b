//! UpdateHub service configuration.
//!
//! Provides [`UpdateHubConfig`] for configuring the service. Configuration
//! values are loaded from environment variables; the storage file names are
//! fixed constants because the service manages exactly one artifact and one
//! version pointer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// File holding the current version string, relative to the data directory.
pub const VERSION_FILE_NAME: &str = "latest_version.txt";

/// Directory holding the installer package, relative to the data directory.
pub const PACKAGE_DIR_NAME: &str = "packages";

/// Fixed on-disk name of the stored installer package.
pub const ARTIFACT_FILE_NAME: &str = "latest_package.exe";

/// Attachment filename presented to downloading clients.
pub const DOWNLOAD_FILE_NAME: &str = "UpdateHub-Install-X64.exe";

/// The only file extension accepted for uploaded packages.
pub const ACCEPTED_EXTENSION: &str = ".exe";

/// Service configuration.
///
/// All fields have defaults matching the reference deployment. Configuration
/// can be loaded from environment variables via [`UpdateHubConfig::from_env`].
///
/// # Examples
///
/// ```
/// use updatehub_core::config::UpdateHubConfig;
///
/// let config = UpdateHubConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:10250");
/// assert_eq!(config.replay_window_secs, 300);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHubConfig {
    /// Bind address for the server (e.g. `"0.0.0.0:10250"`).
    #[builder(default = String::from("0.0.0.0:10250"))]
    pub gateway_listen: String,

    /// Shared HMAC signing secret. Production deployments must override this
    /// via `UPDATEHUB_SECRET_KEY`.
    #[builder(default = String::from("version_control_secret_key_2025"))]
    pub secret_key: String,

    /// Directory holding the version file and the package directory.
    #[builder(default = String::from("./data"))]
    pub data_dir: String,

    /// Accepted clock skew, in seconds, between a request timestamp and
    /// server time (in either direction).
    #[builder(default = 300)]
    pub replay_window_secs: u64,

    /// Version string the store is initialized with when no state exists.
    #[builder(default = String::from("1.0.3"))]
    pub default_version: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Whether to skip signature validation on incoming requests
    /// (development only).
    #[builder(default = false)]
    pub skip_signature_validation: bool,
}

impl Default for UpdateHubConfig {
    fn default() -> Self {
        Self {
            gateway_listen: String::from("0.0.0.0:10250"),
            secret_key: String::from("version_control_secret_key_2025"),
            data_dir: String::from("./data"),
            replay_window_secs: 300,
            default_version: String::from("1.0.3"),
            log_level: String::from("info"),
            skip_signature_validation: false,
        }
    }
}

impl UpdateHubConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `GATEWAY_LISTEN` | `gateway_listen` |
    /// | `UPDATEHUB_SECRET_KEY` | `secret_key` |
    /// | `DATA_DIR` | `data_dir` |
    /// | `REPLAY_WINDOW_SECS` | `replay_window_secs` |
    /// | `DEFAULT_VERSION` | `default_version` |
    /// | `LOG_LEVEL` | `log_level` |
    /// | `SKIP_SIGNATURE_VALIDATION` | `skip_signature_validation` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = std::env::var("UPDATEHUB_SECRET_KEY") {
            config.secret_key = v;
        }
        if let Ok(v) = std::env::var("DATA_DIR") {
            config.data_dir = v;
        }
        if let Ok(v) = std::env::var("REPLAY_WINDOW_SECS") {
            if let Ok(secs) = v.parse() {
                config.replay_window_secs = secs;
            }
        }
        if let Ok(v) = std::env::var("DEFAULT_VERSION") {
            config.default_version = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = std::env::var("SKIP_SIGNATURE_VALIDATION") {
            config.skip_signature_validation = v == "1" || v.eq_ignore_ascii_case("true");
        }

        config
    }

    /// Absolute-or-relative path of the current-version file.
    #[must_use]
    pub fn version_file_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(VERSION_FILE_NAME)
    }

    /// Path of the directory holding the installer package.
    #[must_use]
    pub fn package_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(PACKAGE_DIR_NAME)
    }

    /// Path of the stored installer package.
    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.package_dir().join(ARTIFACT_FILE_NAME)
    }

    /// The logical artifact path reported to upload clients.
    #[must_use]
    pub fn artifact_logical_path() -> String {
        format!("{PACKAGE_DIR_NAME}/{ARTIFACT_FILE_NAME}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = UpdateHubConfig::default();
        assert_eq!(config.gateway_listen, "0.0.0.0:10250");
        assert_eq!(config.default_version, "1.0.3");
        assert_eq!(config.replay_window_secs, 300);
        assert!(!config.skip_signature_validation);
    }

    #[test]
    fn test_should_derive_storage_paths_from_data_dir() {
        let config = UpdateHubConfig::builder()
            .data_dir(String::from("/var/lib/updatehub"))
            .build();
        assert_eq!(
            config.version_file_path(),
            PathBuf::from("/var/lib/updatehub/latest_version.txt")
        );
        assert_eq!(
            config.artifact_path(),
            PathBuf::from("/var/lib/updatehub/packages/latest_package.exe")
        );
    }

    #[test]
    fn test_should_report_logical_artifact_path() {
        assert_eq!(
            UpdateHubConfig::artifact_logical_path(),
            "packages/latest_package.exe"
        );
    }
}
