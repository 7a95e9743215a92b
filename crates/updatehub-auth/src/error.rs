//! Error types for request authentication.
//!
//! All authentication failures are represented by [`AuthError`], which
//! provides a specific variant for each failure mode encountered by the
//! replay guard and signature verification. Every variant maps to HTTP 401;
//! the gate resolves these before any handler logic runs.

/// Errors that can occur while authenticating a signed request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The `X-Timestamp` or `X-Signature` header is missing.
    #[error("Missing authentication headers")]
    MissingCredentials,

    /// The `X-Timestamp` header is not an integer number of seconds.
    #[error("Malformed request timestamp: {0}")]
    MalformedTimestamp(String),

    /// The request timestamp lies outside the replay window.
    #[error("Request timestamp outside the accepted window")]
    Expired,

    /// The computed signature does not match the provided signature.
    #[error("Signature verification failed")]
    BadSignature,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_render_human_readable_messages() {
        assert_eq!(
            AuthError::MissingCredentials.to_string(),
            "Missing authentication headers"
        );
        assert_eq!(
            AuthError::MalformedTimestamp("abc".to_owned()).to_string(),
            "Malformed request timestamp: abc"
        );
        assert_eq!(
            AuthError::Expired.to_string(),
            "Request timestamp outside the accepted window"
        );
        assert_eq!(
            AuthError::BadSignature.to_string(),
            "Signature verification failed"
        );
    }
}
