//! Signing-string construction for UpdateHub request authentication.
//!
//! This module implements the canonical format over which signatures are
//! computed:
//!
//! ```text
//! METHOD:PATH:TIMESTAMP:QUERY_STRING
//! ```
//!
//! Each component is taken verbatim from the request to ensure deterministic
//! signature computation on both sides.

/// Build the signing string from its components.
///
/// The result is a colon-separated string of:
/// 1. HTTP method (uppercase, as sent)
/// 2. URI path (no decoding or normalization)
/// 3. Timestamp (integer seconds since epoch)
/// 4. Raw query string
///
/// The query string is preserved exactly as it appears in the request line —
/// no decode/re-encode pass — because the server must sign the same bytes the
/// client signed. A request without a query signs an empty final component
/// rather than omitting it, so `"GET:/a:1:"` (no query) can never collide
/// with a signing string for a different path shape.
///
/// # Examples
///
/// ```
/// use updatehub_auth::canonical::build_signing_string;
///
/// assert_eq!(
///     build_signing_string("GET", "/api/version/compare", 1700000000, "version=1.0.3"),
///     "GET:/api/version/compare:1700000000:version=1.0.3"
/// );
/// assert_eq!(
///     build_signing_string("POST", "/api/upload/package", 1700000000, ""),
///     "POST:/api/upload/package:1700000000:"
/// );
/// ```
#[must_use]
pub fn build_signing_string(method: &str, path: &str, timestamp: u64, query: &str) -> String {
    format!("{method}:{path}:{timestamp}:{query}")
}
