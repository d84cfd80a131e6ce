//! Port for user profile persistence.
//!
//! A profile records the program a user registered for. Personalised
//! queries require one; registration writes one.

use async_trait::async_trait;

use crate::domain::{UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user profile repository adapters.
    pub enum UserProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile repository query failed: {message}",
    }
}

/// Port for user profile storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Fetch the profile for a user, `None` when the user never registered.
    async fn find_by_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError>;

    /// Insert the profile, or replace the program of an existing one.
    ///
    /// Implementations must perform this atomically so concurrent
    /// registrations for the same user leave exactly one record.
    async fn upsert(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError>;
}

/// Fixture implementation that knows no users and discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserProfileRepository;

#[async_trait]
impl UserProfileRepository for FixtureUserProfileRepository {
    async fn find_by_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        Ok(None)
    }

    async fn upsert(&self, _profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
        Ok(())
    }
}
