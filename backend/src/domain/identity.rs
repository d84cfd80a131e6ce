//! Credential to user resolution with rotation-aware caching.
//!
//! The cache is process-wide state owned by [`IdentityResolver`]: created
//! empty when the server starts, mutated under a lock, and never reset.
//! Entries are keyed by credential fingerprint so raw tokens are not kept.
//!
//! At most one credential maps to a given user at any time. When a lookup
//! returns a user already cached under an older credential, the older entry
//! is evicted before the new one is inserted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Credential, CredentialFingerprint, Error, UserId};

/// Resolves credentials through an [`IdentityProvider`], caching results.
pub struct IdentityResolver<P: ?Sized> {
    provider: Arc<P>,
    cache: Mutex<HashMap<CredentialFingerprint, UserId>>,
}

impl<P: ?Sized> IdentityResolver<P> {
    /// Create a resolver with an empty cache.
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CredentialFingerprint, UserId>> {
        // Every critical section leaves the map consistent, so a poisoned
        // lock still guards valid data.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether `credential` currently has a cached resolution.
    pub fn is_cached(&self, credential: &Credential) -> bool {
        self.entries().contains_key(&credential.fingerprint())
    }

    /// Number of cached credentials resolving to `user_id`.
    ///
    /// Always `0` or `1`.
    pub fn cached_credentials_for(&self, user_id: &UserId) -> usize {
        self.entries().values().filter(|cached| *cached == user_id).count()
    }

    /// Total number of cached credentials.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P> IdentityResolver<P>
where
    P: IdentityProvider + ?Sized,
{
    fn map_provider_error(error: IdentityProviderError) -> Error {
        let (kind, message) = match &error {
            IdentityProviderError::Transport { .. } => ("transport", "identity provider unreachable"),
            IdentityProviderError::Timeout { .. } => ("timeout", "identity provider timed out"),
            IdentityProviderError::Rejected { .. } => ("rejected", "credential rejected"),
            IdentityProviderError::Decode { .. } => ("decode", "identity provider answer unusable"),
        };
        warn!(error = %error, kind, "identity lookup failed");
        Error::identity_unresolved(message).with_details(json!({ "kind": kind }))
    }

    /// Map `credential` to a stable user id.
    ///
    /// A cache hit returns without contacting the provider. A miss performs
    /// exactly one lookup; failures leave the cache untouched and are not
    /// retried.
    pub async fn resolve(&self, credential: &Credential) -> Result<UserId, Error> {
        let fingerprint = credential.fingerprint();
        let cached = self.entries().get(&fingerprint).cloned();
        if let Some(user_id) = cached {
            debug!(%user_id, "identity cache hit");
            return Ok(user_id);
        }

        let user_id = self
            .provider
            .lookup(credential)
            .await
            .map_err(Self::map_provider_error)?;

        let evicted = {
            let mut entries = self.entries();
            let before = entries.len();
            entries.retain(|cached_fingerprint, cached_user| {
                *cached_fingerprint == fingerprint || *cached_user != user_id
            });
            let evicted = before - entries.len();
            entries.insert(fingerprint, user_id.clone());
            evicted
        };

        if evicted > 0 {
            info!(%user_id, evicted, "evicted rotated credential");
        }
        debug!(%user_id, "identity resolved");
        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockIdentityProvider;
    use rstest::rstest;

    fn credential(token: &str) -> Credential {
        Credential::new(token).expect("valid credential")
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).expect("valid id")
    }

    #[tokio::test]
    async fn cache_hit_skips_the_provider() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_lookup()
            .times(1)
            .returning(|_| Ok(UserId::new("user-1").expect("valid id")));
        let resolver = IdentityResolver::new(Arc::new(provider));

        let first = resolver.resolve(&credential("tok1")).await.expect("resolve");
        let second = resolver.resolve(&credential("tok1")).await.expect("resolve");

        assert_eq!(first, second);
        assert_eq!(resolver.len(), 1);
    }

    #[tokio::test]
    async fn rotated_credential_evicts_the_previous_entry() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_lookup()
            .times(2)
            .returning(|_| Ok(UserId::new("user-1").expect("valid id")));
        let resolver = IdentityResolver::new(Arc::new(provider));

        resolver.resolve(&credential("tok1")).await.expect("resolve");
        resolver.resolve(&credential("tok2")).await.expect("resolve");

        assert!(!resolver.is_cached(&credential("tok1")));
        assert!(resolver.is_cached(&credential("tok2")));
        assert_eq!(resolver.cached_credentials_for(&user("user-1")), 1);
    }

    #[tokio::test]
    async fn other_users_are_not_evicted() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_lookup().times(2).returning(|credential| {
            Ok(UserId::new(format!("user-{}", credential.expose())).expect("valid id"))
        });
        let resolver = IdentityResolver::new(Arc::new(provider));

        resolver.resolve(&credential("a")).await.expect("resolve");
        resolver.resolve(&credential("b")).await.expect("resolve");

        assert_eq!(resolver.len(), 2);
    }

    #[rstest]
    #[case::transport(IdentityProviderError::transport("connection reset"))]
    #[case::timeout(IdentityProviderError::timeout("5s elapsed"))]
    #[case::rejected(IdentityProviderError::rejected(401_u16))]
    #[case::decode(IdentityProviderError::decode("missing user_id"))]
    #[tokio::test]
    async fn failures_are_unresolved_and_not_cached(#[case] failure: IdentityProviderError) {
        let mut provider = MockIdentityProvider::new();
        provider.expect_lookup().times(1).return_once(move |_| Err(failure));
        let resolver = IdentityResolver::new(Arc::new(provider));

        let err = resolver
            .resolve(&credential("tok1"))
            .await
            .expect_err("lookup fails");

        assert_eq!(err.code(), ErrorCode::IdentityUnresolved);
        assert!(resolver.is_empty());
    }
}
