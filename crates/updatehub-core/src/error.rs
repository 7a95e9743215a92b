//! UpdateHub error taxonomy.
//!
//! Defines [`UpdateError`], the domain error enum covering every failure the
//! service can surface to a caller. Each variant maps to an HTTP status code
//! through [`UpdateError::status_code`]; [`UpdateError::public_message`]
//! yields the caller-visible text, keeping storage internals out of
//! responses.
//!
//! Authentication failures live in `updatehub-auth` and are resolved by the
//! gate before handler logic runs; they never appear here.

use http::StatusCode;

/// Service error type.
///
/// Validation variants (400) are produced by handlers before any storage is
/// touched. Storage failures are caught at the point of I/O and carried as
/// [`UpdateError::Internal`] so the process never crashes on a bad disk.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// A required query parameter is absent.
    #[error("Missing required parameter: {name}")]
    MissingParam {
        /// The parameter that was not supplied.
        name: &'static str,
    },

    /// The supplied version string does not match `x.y.z` syntax.
    #[error("Invalid version format: {input} (expected dotted integers, e.g. x.y.z)")]
    InvalidVersionFormat {
        /// The rejected input.
        input: String,
    },

    /// The upload request carried no file part.
    #[error("No file uploaded")]
    NoFile,

    /// The upload request carried a file part without a filename.
    #[error("No file selected")]
    EmptyFilename,

    /// The uploaded file does not have the accepted extension.
    #[error("Unsupported file type: {filename} (only .exe uploads are accepted)")]
    UnsupportedType {
        /// The rejected filename.
        filename: String,
    },

    /// The multipart body could not be parsed.
    #[error("Malformed multipart body: {reason}")]
    InvalidMultipart {
        /// What the parser could not make sense of.
        reason: String,
    },

    /// The requested method/path combination is not served.
    #[error("No such endpoint: {path}")]
    UnknownRoute {
        /// The unmatched request path.
        path: String,
    },

    /// No installer package has been uploaded yet.
    #[error("No installer package has been uploaded yet")]
    ArtifactMissing,

    /// Internal error with context (storage and other unexpected failures).
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UpdateError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParam { .. }
            | Self::InvalidVersionFormat { .. }
            | Self::NoFile
            | Self::EmptyFilename
            | Self::UnsupportedType { .. }
            | Self::InvalidMultipart { .. } => StatusCode::BAD_REQUEST,
            Self::UnknownRoute { .. } | Self::ArtifactMissing => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The caller-visible error message.
    ///
    /// Internal errors surface a fixed generic message; their context is for
    /// logs only.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => String::from("Internal server error"),
            other => other.to_string(),
        }
    }
}

/// Convenience result type for UpdateHub operations.
pub type UpdateResult<T> = Result<T, UpdateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map_validation_errors_to_400() {
        assert_eq!(
            UpdateError::MissingParam { name: "version" }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            UpdateError::InvalidVersionFormat {
                input: "1.a".to_owned()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(UpdateError::NoFile.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            UpdateError::EmptyFilename.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            UpdateError::UnsupportedType {
                filename: "setup.zip".to_owned()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_should_map_missing_resources_to_404() {
        assert_eq!(
            UpdateError::ArtifactMissing.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            UpdateError::UnknownRoute {
                path: "/nope".to_owned()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_should_hide_internal_error_details() {
        let err = UpdateError::Internal(anyhow::anyhow!("disk exploded at /secret/path"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
        assert!(!err.public_message().contains("/secret/path"));
    }

    #[test]
    fn test_should_expose_validation_messages() {
        let err = UpdateError::MissingParam { name: "version" };
        assert_eq!(err.public_message(), "Missing required parameter: version");
    }
}
