//! Port for the external identity provider.
//!
//! The provider exchanges a per-session access credential for the stable
//! identifier of the account behind it.

use async_trait::async_trait;

use crate::domain::{Credential, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider could not be reached.
        Transport { message: String } =>
            "identity provider transport failed: {message}",
        /// The provider did not answer in time.
        Timeout { message: String } =>
            "identity provider timed out: {message}",
        /// The provider refused the credential.
        Rejected { status: u16 } =>
            "identity provider rejected the credential with status {status}",
        /// The provider answered with an unusable payload.
        Decode { message: String } =>
            "identity provider response could not be decoded: {message}",
    }
}

/// Port for resolving credentials to user identifiers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up the account behind `credential`.
    async fn lookup(&self, credential: &Credential) -> Result<UserId, IdentityProviderError>;
}

/// Fixture provider that treats the credential text as the user id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn lookup(&self, credential: &Credential) -> Result<UserId, IdentityProviderError> {
        UserId::new(credential.expose())
            .map_err(|err| IdentityProviderError::decode(err.to_string()))
    }
}
