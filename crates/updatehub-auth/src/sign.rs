//! HMAC-SHA256 signing and constant-time verification.
//!
//! A signature is `hex(HMAC-SHA256(secret, signing_string))`, lowercase.
//! Verification recomputes the signature and compares it against the
//! candidate with a constant-time equality check so that byte-by-byte
//! mismatch position cannot be observed through response timing.

use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::canonical::build_signing_string;

type HmacSha256 = Hmac<Sha256>;

/// Compute the signature for a request: lowercase hex HMAC-SHA256 over the
/// signing string.
///
/// Pure given its inputs; this is the same computation clients perform when
/// populating `X-Signature`.
///
/// # Examples
///
/// ```
/// use updatehub_auth::sign::sign;
///
/// let sig = sign("secret", "GET", "/api/version/compare", 1700000000, "version=1.0.3");
/// assert_eq!(sig.len(), 64);
/// assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
/// ```
#[must_use]
pub fn sign(secret: &str, method: &str, path: &str, timestamp: u64, query: &str) -> String {
    let signing_string = build_signing_string(method, path, timestamp, query);
    compute_hmac_hex(secret, &signing_string)
}

/// Verify a candidate signature against the recomputed one.
///
/// Uses constant-time comparison. Returns `false` on any mismatch, including
/// length differences.
#[must_use]
pub fn verify(
    secret: &str,
    candidate: &str,
    method: &str,
    path: &str,
    timestamp: u64,
    query: &str,
) -> bool {
    let expected = sign(secret, method, path, timestamp, query);
    candidate.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Compute `hex(HMAC-SHA256(secret, message))`.
fn compute_hmac_hex(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can accept any key length");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
