//! Typed operation outputs.
//!
//! The provider returns these structs; the HTTP layer serializes them to
//! JSON (or streams them, for downloads). Field names are part of the wire
//! contract.

use bytes::Bytes;
use serde::Serialize;

/// Result code: the client's version is current (possibly after the service
/// adopted it as the new baseline).
pub const CODE_UP_TO_DATE: u8 = 0;

/// Result code: the client's version is behind the service's latest.
pub const CODE_OUTDATED: u8 = 1;

/// Response payload for the version-compare operation.
#[derive(Debug, Clone, Serialize)]
pub struct CompareOutput {
    /// [`CODE_UP_TO_DATE`] or [`CODE_OUTDATED`].
    pub code: u8,
    /// Human-readable outcome description.
    pub message: String,
    /// The version string the client supplied.
    pub input_version: String,
    /// The service's latest version after handling this request.
    pub latest_version: String,
    /// Present and `true` when this request moved the baseline forward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<bool>,
}

/// Response payload for a successful package upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutput {
    /// Always `"success"` for a 200 response.
    pub status: String,
    /// Human-readable confirmation.
    pub message: String,
    /// Size of the committed package in bytes.
    pub file_size: u64,
    /// Logical storage path of the package.
    pub file_path: String,
}

/// A downloadable artifact: the full bytes plus presentation metadata.
#[derive(Debug, Clone)]
pub struct ArtifactDownload {
    /// The artifact bytes.
    pub data: Bytes,
    /// Size in bytes (equals `data.len()`, recorded for audit logging).
    pub size: u64,
    /// Attachment filename presented to the client.
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_compare_output_without_updated_flag() {
        let output = CompareOutput {
            code: CODE_UP_TO_DATE,
            message: "Current version is up to date".to_owned(),
            input_version: "1.0.3".to_owned(),
            latest_version: "1.0.3".to_owned(),
            updated: None,
        };
        let json = serde_json::to_value(&output).expect("serializes");
        assert_eq!(json["code"], 0);
        assert_eq!(json["input_version"], "1.0.3");
        assert!(json.get("updated").is_none());
    }

    #[test]
    fn test_should_serialize_updated_flag_when_set() {
        let output = CompareOutput {
            code: CODE_UP_TO_DATE,
            message: "Current version is up to date".to_owned(),
            input_version: "1.0.5".to_owned(),
            latest_version: "1.0.5".to_owned(),
            updated: Some(true),
        };
        let json = serde_json::to_value(&output).expect("serializes");
        assert_eq!(json["updated"], true);
    }

    #[test]
    fn test_should_serialize_upload_output() {
        let output = UploadOutput {
            status: "success".to_owned(),
            message: "Package uploaded successfully".to_owned(),
            file_size: 42,
            file_path: "packages/latest_package.exe".to_owned(),
        };
        let json = serde_json::to_value(&output).expect("serializes");
        assert_eq!(json["status"], "success");
        assert_eq!(json["file_size"], 42);
        assert_eq!(json["file_path"], "packages/latest_package.exe");
    }
}
