//! Timestamped HMAC-SHA256 request authentication for UpdateHub.
//!
//! This crate provides the signature engine and replay guard protecting the
//! UpdateHub API. Every request carries two headers:
//!
//! - `X-Timestamp` — integer seconds since the Unix epoch, as text
//! - `X-Signature` — lowercase hex HMAC-SHA256 over the signing string
//!
//! The signing string is derived deterministically from the request:
//!
//! ```text
//! METHOD:PATH:TIMESTAMP:QUERY_STRING
//! ```
//!
//! where `QUERY_STRING` is the raw, undecoded query portion (empty string if
//! the request has none). Clients must replicate this construction exactly.
//!
//! # Overview
//!
//! Verification is a two-stage gate. The replay guard first checks that the
//! request timestamp lies within a bounded window of server time, bounding
//! replay exposure in both directions. Only then is the signature recomputed
//! and compared in constant time.
//!
//! # Usage
//!
//! ```rust
//! use updatehub_auth::secret::{SecretProvider, StaticSecretProvider};
//! use updatehub_auth::sign::sign;
//!
//! let provider = StaticSecretProvider::new("my-shared-secret");
//!
//! // A client computes the signature it will place in X-Signature.
//! let signature = sign(
//!     provider.signing_secret(),
//!     "GET",
//!     "/api/version/compare",
//!     1_700_000_000,
//!     "version=1.0.3",
//! );
//! assert_eq!(signature.len(), 64);
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Signing-string construction
//! - [`error`] - Authentication error types
//! - [`guard`] - Replay-window enforcement and the request gate
//! - [`secret`] - Secret provider trait and static implementation
//! - [`sign`] - HMAC-SHA256 signing and constant-time verification

pub mod canonical;
pub mod error;
pub mod guard;
pub mod secret;
pub mod sign;

pub use canonical::build_signing_string;
pub use error::AuthError;
pub use guard::authenticate;
pub use secret::{SecretProvider, StaticSecretProvider};
pub use sign::{sign, verify};
