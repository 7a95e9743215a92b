//! The replay guard: the per-request authentication gate.
//!
//! Every protected request must carry `X-Timestamp` and `X-Signature`
//! headers. The guard checks, in order:
//!
//! 1. Both headers are present and readable
//! 2. The timestamp parses as integer seconds since the epoch
//! 3. `|now - timestamp| <= window` — the symmetric replay window bounds
//!    replay exposure in both directions, tolerating clock skew equally
//!    ahead of and behind server time (boundary inclusive)
//! 4. The signature verifies against the recomputed HMAC
//!
//! The guard resolves all authentication failures itself; handler logic
//! never observes a rejected request. Each outcome is recorded as a
//! structured audit event, the gate's only side effect.

use tracing::{debug, warn};

use crate::error::AuthError;
use crate::secret::SecretProvider;
use crate::sign::verify;

/// Header carrying the request timestamp, integer seconds since epoch.
pub const TIMESTAMP_HEADER: &str = "x-timestamp";

/// Header carrying the lowercase hex HMAC-SHA256 signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Authenticate a signed request.
///
/// `now` is the server's current time in seconds since the epoch; it is a
/// parameter rather than read from the clock so callers control it and tests
/// can pin it.
///
/// # Errors
///
/// - [`AuthError::MissingCredentials`] if either header is absent or not
///   valid header text
/// - [`AuthError::MalformedTimestamp`] if the timestamp is not an integer
/// - [`AuthError::Expired`] if the timestamp is more than `window_secs`
///   away from `now` in either direction
/// - [`AuthError::BadSignature`] if the signature does not match
pub fn authenticate(
    parts: &http::request::Parts,
    provider: &dyn SecretProvider,
    window_secs: u64,
    now: u64,
) -> Result<(), AuthError> {
    let path = parts.uri.path();

    let (timestamp_text, signature) = match (
        header_str(parts, TIMESTAMP_HEADER),
        header_str(parts, SIGNATURE_HEADER),
    ) {
        (Some(ts), Some(sig)) => (ts, sig),
        _ => {
            warn!(path, "request rejected: missing authentication headers");
            return Err(AuthError::MissingCredentials);
        }
    };

    let timestamp: u64 = match timestamp_text.parse() {
        Ok(ts) => ts,
        Err(_) => {
            warn!(path, timestamp = timestamp_text, "request rejected: malformed timestamp");
            return Err(AuthError::MalformedTimestamp(timestamp_text.to_owned()));
        }
    };

    let skew = now.abs_diff(timestamp);
    if skew > window_secs {
        warn!(
            path,
            timestamp,
            now,
            skew,
            window_secs,
            "request rejected: timestamp outside replay window"
        );
        return Err(AuthError::Expired);
    }

    let method = parts.method.as_str();
    let query = parts.uri.query().unwrap_or("");

    if verify(
        provider.signing_secret(),
        signature,
        method,
        path,
        timestamp,
        query,
    ) {
        debug!(path, method, timestamp, "request authenticated");
        Ok(())
    } else {
        warn!(path, method, timestamp, "request rejected: signature mismatch");
        Err(AuthError::BadSignature)
    }
}

/// Extract a header value as a string, if present and valid text.
fn header_str<'a>(parts: &'a http::request::Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}
