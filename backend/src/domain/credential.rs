//! Opaque per-session access credential.

use std::fmt;

use sha2::{Digest, Sha256};

/// Validation errors returned by [`Credential::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    /// The credential was empty or whitespace only.
    #[error("credential must not be empty")]
    Empty,
}

/// Access token handed to the assistant by the dispatcher.
///
/// The raw value is only reachable through [`Credential::expose`]; `Debug`
/// redacts it so the token never lands in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token.
    ///
    /// # Examples
    /// ```
    /// use campus_assistant::domain::Credential;
    ///
    /// let credential = Credential::new("Atza|token").expect("valid credential");
    /// assert_eq!(format!("{credential:?}"), "Credential(<redacted>)");
    /// ```
    pub fn new(token: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CredentialValidationError::Empty);
        }
        Ok(Self(token))
    }

    /// Raw token for adapters that must forward it.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Hex-encoded SHA-256 digest of the token, used as the cache key.
    pub fn fingerprint(&self) -> CredentialFingerprint {
        let digest = Sha256::digest(self.0.as_bytes());
        CredentialFingerprint(hex::encode(digest))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Stable, log-safe digest of a [`Credential`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialFingerprint(String);

impl CredentialFingerprint {
    /// Hex digest.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CredentialFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
