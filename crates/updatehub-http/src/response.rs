//! Response construction and error mapping.
//!
//! All API responses are JSON except the installer download (an attachment)
//! and the landing page (HTML). Errors are serialized as
//! `{"error": "<message>"}` with the status code owned by the error type;
//! the missing-artifact 404 additionally carries an `upload_endpoint` hint.

use bytes::Bytes;
use http::StatusCode;
use http::header::HeaderValue;
use serde::Serialize;
use serde_json::json;

use updatehub_auth::AuthError;
use updatehub_core::UpdateError;
use updatehub_core::model::ArtifactDownload;

use crate::body::ResponseBody;
use crate::router::UPLOAD_ENDPOINT;

/// Build a JSON response with the given status.
///
/// Serialization failures fall back to a bare 500 — they cannot happen for
/// the fixed response types this service emits.
pub fn json_response<T: Serialize>(status: StatusCode, payload: &T) -> http::Response<ResponseBody> {
    let body = match serde_json::to_vec(payload) {
        Ok(bytes) => ResponseBody::from_bytes(Bytes::from(bytes)),
        Err(_) => return fallback_error_response(),
    };

    http::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap_or_else(|_| fallback_error_response())
}

/// Build an HTML response (the landing page).
#[must_use]
pub fn html_response(html: String) -> http::Response<ResponseBody> {
    http::Response::builder()
        .status(StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(ResponseBody::from_string(html))
        .unwrap_or_else(|_| fallback_error_response())
}

/// Build the attachment response streaming the installer to the client.
#[must_use]
pub fn attachment_response(download: ArtifactDownload) -> http::Response<ResponseBody> {
    let disposition = format!("attachment; filename=\"{}\"", download.file_name);

    let mut builder = http::Response::builder()
        .status(StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/octet-stream")
        .header(http::header::CONTENT_LENGTH, download.size);

    if let Ok(hv) = HeaderValue::from_str(&disposition) {
        builder = builder.header(http::header::CONTENT_DISPOSITION, hv);
    }

    builder
        .body(ResponseBody::from_bytes(download.data))
        .unwrap_or_else(|_| fallback_error_response())
}

/// Convert a service error into an HTTP error response.
#[must_use]
pub fn error_to_response(err: &UpdateError) -> http::Response<ResponseBody> {
    let payload = match err {
        // The 404 for a missing package points the operator at the upload
        // endpoint, matching the API contract.
        UpdateError::ArtifactMissing => json!({
            "error": err.public_message(),
            "upload_endpoint": UPLOAD_ENDPOINT,
        }),
        other => json!({ "error": other.public_message() }),
    };

    json_response(err.status_code(), &payload)
}

/// Convert an authentication error into a 401 response.
#[must_use]
pub fn auth_error_to_response(err: &AuthError) -> http::Response<ResponseBody> {
    json_response(
        StatusCode::UNAUTHORIZED,
        &json!({ "error": err.to_string() }),
    )
}

/// Last-resort response when a builder fails.
fn fallback_error_response() -> http::Response<ResponseBody> {
    http::Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .body(ResponseBody::empty())
        .expect("static response should be valid")
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_json(response: http::Response<ResponseBody>) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    #[tokio::test]
    async fn test_should_build_json_response() {
        let response = json_response(StatusCode::OK, &serde_json::json!({"code": 0}));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json"),
        );
        assert_eq!(body_json(response).await["code"], 0);
    }

    #[test]
    fn test_should_build_attachment_response() {
        let download = ArtifactDownload {
            data: Bytes::from_static(b"installer"),
            size: 9,
            file_name: String::from("UpdateHub-Install-X64.exe"),
        };
        let response = attachment_response(download);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(http::header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
            Some("attachment; filename=\"UpdateHub-Install-X64.exe\""),
        );
        assert_eq!(
            response
                .headers()
                .get(http::header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok()),
            Some("9"),
        );
    }

    #[tokio::test]
    async fn test_should_map_validation_error_to_400_payload() {
        let err = UpdateError::MissingParam { name: "version" };
        let response = error_to_response(&err);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Missing required parameter: version");
    }

    #[tokio::test]
    async fn test_should_attach_upload_hint_to_missing_artifact_404() {
        let response = error_to_response(&UpdateError::ArtifactMissing);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["upload_endpoint"], "/api/upload/package");
        assert!(json["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_should_hide_internal_details_in_500_payload() {
        let err = UpdateError::Internal(anyhow::anyhow!("disk at /var/secret failed"));
        let response = error_to_response(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_should_map_auth_error_to_401() {
        let response = auth_error_to_response(&AuthError::BadSignature);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Signature verification failed");
    }
}
