//! User identity and profile model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalogue::ProgramId;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier carried leading or trailing whitespace.
    #[error("user id must not carry surrounding whitespace")]
    PaddedId,
}

/// Stable user identifier issued by the identity provider or the dispatcher.
///
/// Identifiers are opaque; the only invariants are that they are non-empty
/// and carry no surrounding whitespace, so that equality is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use campus_assistant::domain::UserId;
    ///
    /// let id = UserId::new("amzn1.account.ABC").expect("valid id");
    /// assert_eq!(id.as_ref(), "amzn1.account.ABC");
    /// assert!(UserId::new(" padded ").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A registered user's profile: the program of study they selected.
///
/// Exactly one profile exists per [`UserId`]; re-registering replaces the
/// program in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Owner of the profile.
    pub user_id: UserId,
    /// Selected program of study.
    pub program: ProgramId,
}

impl UserProfile {
    /// Build a profile for the given user and program.
    pub fn new(user_id: UserId, program: ProgramId) -> Self {
        Self { user_id, program }
    }
}
