//! Request routing: maps method + path to an UpdateHub operation.
//!
//! The API surface is fixed — three authenticated endpoints plus the
//! unauthenticated landing page — so routing is exact matching on the
//! method and path, with query parameters parsed for the handlers.

use http::Method;
use percent_encoding::percent_decode_str;

use updatehub_core::UpdateError;

/// Path of the version-compare endpoint.
pub const COMPARE_ENDPOINT: &str = "/api/version/compare";

/// Path of the download endpoint.
pub const DOWNLOAD_ENDPOINT: &str = "/api/download/latest";

/// Path of the upload endpoint (also used as the hint in 404 payloads when
/// no package exists yet).
pub const UPLOAD_ENDPOINT: &str = "/api/upload/package";

/// The operations served by UpdateHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperation {
    /// `GET /` — unauthenticated HTML landing page.
    Index,
    /// `GET /api/version/compare?version=...`
    CompareVersion,
    /// `GET /api/download/latest`
    DownloadLatest,
    /// `POST /api/upload/package`
    UploadPackage,
}

impl UpdateOperation {
    /// Stable operation name for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "Index",
            Self::CompareVersion => "CompareVersion",
            Self::DownloadLatest => "DownloadLatest",
            Self::UploadPackage => "UploadPackage",
        }
    }

    /// Whether the authentication gate applies to this operation.
    ///
    /// Only the landing page is public; every API operation is signed.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Index)
    }
}

impl std::fmt::Display for UpdateOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of routing an HTTP request.
#[derive(Debug, Clone)]
pub struct RoutingContext {
    /// The identified operation.
    pub operation: UpdateOperation,
    /// Parsed (percent-decoded) query parameters from the request URI.
    pub query_params: Vec<(String, String)>,
}

/// Resolve request parts to a routing context.
///
/// # Errors
///
/// Returns [`UpdateError::UnknownRoute`] if no operation matches the
/// method + path combination.
pub fn resolve(parts: &http::request::Parts) -> Result<RoutingContext, UpdateError> {
    let method = &parts.method;
    let path = parts.uri.path();

    let operation = if *method == Method::GET && path == "/" {
        UpdateOperation::Index
    } else if *method == Method::GET && path == COMPARE_ENDPOINT {
        UpdateOperation::CompareVersion
    } else if *method == Method::GET && path == DOWNLOAD_ENDPOINT {
        UpdateOperation::DownloadLatest
    } else if *method == Method::POST && path == UPLOAD_ENDPOINT {
        UpdateOperation::UploadPackage
    } else {
        return Err(UpdateError::UnknownRoute {
            path: path.to_owned(),
        });
    };

    Ok(RoutingContext {
        operation,
        query_params: parse_query_params(parts.uri.query().unwrap_or("")),
    })
}

/// Parse a raw query string into percent-decoded key/value pairs.
///
/// A parameter without `=` becomes a key with an empty value. Decoding
/// happens here, after signature verification has already consumed the raw
/// bytes.
#[must_use]
pub fn parse_query_params(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|param| {
            let (key, value) = param.split_once('=').unwrap_or((param, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

/// Find the first value for a query parameter.
#[must_use]
pub fn query_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Percent-decode a single query component.
fn decode_component(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_for(method: &str, uri: &str) -> http::request::Parts {
        let (parts, ()) = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .expect("valid request")
            .into_parts();
        parts
    }

    #[test]
    fn test_should_route_api_endpoints() {
        let ctx = resolve(&parts_for("GET", "/api/version/compare?version=1.0.3"))
            .expect("compare routes");
        assert_eq!(ctx.operation, UpdateOperation::CompareVersion);
        assert_eq!(
            query_param(&ctx.query_params, "version"),
            Some("1.0.3")
        );

        let ctx = resolve(&parts_for("GET", "/api/download/latest")).expect("download routes");
        assert_eq!(ctx.operation, UpdateOperation::DownloadLatest);

        let ctx = resolve(&parts_for("POST", "/api/upload/package")).expect("upload routes");
        assert_eq!(ctx.operation, UpdateOperation::UploadPackage);
    }

    #[test]
    fn test_should_route_landing_page_without_auth() {
        let ctx = resolve(&parts_for("GET", "/")).expect("index routes");
        assert_eq!(ctx.operation, UpdateOperation::Index);
        assert!(!ctx.operation.requires_auth());
    }

    #[test]
    fn test_should_require_auth_for_all_api_operations() {
        assert!(UpdateOperation::CompareVersion.requires_auth());
        assert!(UpdateOperation::DownloadLatest.requires_auth());
        assert!(UpdateOperation::UploadPackage.requires_auth());
    }

    #[test]
    fn test_should_reject_unknown_path() {
        let result = resolve(&parts_for("GET", "/api/nope"));
        assert!(matches!(result, Err(UpdateError::UnknownRoute { .. })));
    }

    #[test]
    fn test_should_reject_wrong_method_on_known_path() {
        assert!(resolve(&parts_for("POST", "/api/version/compare")).is_err());
        assert!(resolve(&parts_for("GET", "/api/upload/package")).is_err());
        assert!(resolve(&parts_for("DELETE", "/api/download/latest")).is_err());
    }

    #[test]
    fn test_should_decode_query_parameters() {
        let params = parse_query_params("version=1%2E0%2E3&extra=a%20b");
        assert_eq!(query_param(&params, "version"), Some("1.0.3"));
        assert_eq!(query_param(&params, "extra"), Some("a b"));
    }

    #[test]
    fn test_should_parse_valueless_parameters() {
        let params = parse_query_params("flag&version=1");
        assert_eq!(query_param(&params, "flag"), Some(""));
        assert_eq!(query_param(&params, "version"), Some("1"));
        assert_eq!(query_param(&params, "missing"), None);
    }
}
