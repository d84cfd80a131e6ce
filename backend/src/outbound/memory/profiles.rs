//! In-process user profile store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{UserProfileRepository, UserProfileRepositoryError};
use crate::domain::{UserId, UserProfile};

/// [`UserProfileRepository`] keeping profiles in a map for the process
/// lifetime.
#[derive(Debug, Default)]
pub struct InMemoryUserProfiles {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserProfiles {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nobody has registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserProfileRepository for InMemoryUserProfiles {
    async fn find_by_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let profiles = self.profiles.read().unwrap_or_else(PoisonError::into_inner);
        Ok(profiles.get(user_id).cloned())
    }

    async fn upsert(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
        let mut profiles = self.profiles.write().unwrap_or_else(PoisonError::into_inner);
        profiles.insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }
}
