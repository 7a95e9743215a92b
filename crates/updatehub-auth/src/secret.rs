//! Secret provider trait and implementations.
//!
//! This module defines the [`SecretProvider`] trait for resolving the shared
//! signing secret, along with a [`StaticSecretProvider`] holding a secret
//! loaded once at startup. The signature engine and the replay guard receive
//! the provider by reference; the secret is never read from a global.

/// Trait for resolving the shared HMAC signing secret.
///
/// Implementations may back this with configuration, a secrets manager, or
/// any other store. The protocol uses a single process-wide secret, so the
/// lookup takes no key identifier.
pub trait SecretProvider: Send + Sync {
    /// Return the signing secret used for both signing and verification.
    fn signing_secret(&self) -> &str;
}

/// A provider backed by a secret captured at construction time.
///
/// Suitable for configuration-driven deployments: the binary reads the
/// secret from its environment once and hands it to the service.
///
/// # Examples
///
/// ```
/// use updatehub_auth::secret::{SecretProvider, StaticSecretProvider};
///
/// let provider = StaticSecretProvider::new("shared-secret");
/// assert_eq!(provider.signing_secret(), "shared-secret");
/// ```
#[derive(Debug, Clone)]
pub struct StaticSecretProvider {
    secret: String,
}

impl StaticSecretProvider {
    /// Create a provider holding the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl SecretProvider for StaticSecretProvider {
    fn signing_secret(&self) -> &str {
        &self.secret
    }
}
