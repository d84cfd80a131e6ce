//! Guard in front of personalised handlers.
//!
//! The gate identifies the caller, loads their profile, and only then
//! invokes the wrapped handler with an explicit [`TurnContext`]. Callers
//! without a profile get the registration prompt and the handler is never
//! called.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::handlers::{PersonalisedHandler, TurnContext};
use crate::domain::identity::IdentityResolver;
use crate::domain::ports::{IdentityProvider, UserProfileRepository, UserProfileRepositoryError};
use crate::domain::speech::{self, titles};
use crate::domain::{Card, Error, TurnRequest, TurnResponse, UserId, UserProfile};

/// How the caller's identity is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityMode {
    /// Resolve the rotating access credential through the identity provider.
    #[default]
    Credential,
    /// Trust the stable user id supplied by the dispatcher.
    SessionUser,
}

/// Error returned when parsing an unknown [`IdentityMode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown identity mode `{0}`; expected `credential` or `session_user`")]
pub struct ParseIdentityModeError(String);

impl FromStr for IdentityMode {
    type Err = ParseIdentityModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "credential" => Ok(Self::Credential),
            "session_user" | "session-user" => Ok(Self::SessionUser),
            other => Err(ParseIdentityModeError(other.to_owned())),
        }
    }
}

impl fmt::Display for IdentityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credential => f.write_str("credential"),
            Self::SessionUser => f.write_str("session_user"),
        }
    }
}

/// Identifies callers and guards personalised handlers.
pub struct AccessGate {
    mode: IdentityMode,
    resolver: Arc<IdentityResolver<dyn IdentityProvider>>,
    profiles: Arc<dyn UserProfileRepository>,
}

impl AccessGate {
    /// Create a gate.
    pub fn new(
        mode: IdentityMode,
        resolver: Arc<IdentityResolver<dyn IdentityProvider>>,
        profiles: Arc<dyn UserProfileRepository>,
    ) -> Self {
        Self {
            mode,
            resolver,
            profiles,
        }
    }

    /// Configured identity mode.
    pub fn mode(&self) -> IdentityMode {
        self.mode
    }

    /// Establish who is calling.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::IdentityUnresolved`] when the envelope
    /// lacks the identity the configured mode needs, or resolution fails.
    pub async fn identify(&self, request: &TurnRequest) -> Result<UserId, Error> {
        match self.mode {
            IdentityMode::Credential => {
                let credential = request.identity.access_token.as_ref().ok_or_else(|| {
                    Error::identity_unresolved("request carries no access credential")
                })?;
                self.resolver.resolve(credential).await
            }
            IdentityMode::SessionUser => {
                let raw = request
                    .identity
                    .user_id
                    .as_deref()
                    .ok_or_else(|| Error::identity_unresolved("request carries no user id"))?;
                UserId::new(raw).map_err(|err| Error::identity_unresolved(err.to_string()))
            }
        }
    }

    /// Load the caller's profile, `None` when they never registered.
    pub async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, Error> {
        self.profiles
            .find_by_id(user_id)
            .await
            .map_err(map_profile_error)
    }

    /// Run `handler` for registered callers, prompt everyone else to register.
    pub async fn guard(
        &self,
        request: &TurnRequest,
        handler: &dyn PersonalisedHandler,
    ) -> Result<TurnResponse, Error> {
        let user_id = self.identify(request).await?;
        let profile = self
            .profile(&user_id)
            .await
            .map_err(|err| err.with_caller(&user_id))?;
        let Some(profile) = profile else {
            info!(
                %user_id,
                session_id = %request.session_id,
                "unregistered caller redirected to registration"
            );
            return Ok(registration_prompt());
        };

        debug!(%user_id, program = %profile.program, "caller registered");
        let context = TurnContext {
            user_id: user_id.clone(),
            profile,
        };
        handler
            .handle(request, &context)
            .await
            .map_err(|err| err.with_caller(&user_id))
    }
}

pub(crate) fn map_profile_error(error: UserProfileRepositoryError) -> Error {
    match error {
        UserProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile store unavailable: {message}"))
        }
        UserProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile store error: {message}"))
        }
    }
}

fn registration_prompt() -> TurnResponse {
    TurnResponse::speak(speech::REGISTRATION_REQUIRED).with_card(Card {
        title: titles::SIGN_UP_PROMPT.to_owned(),
        body: speech::REGISTRATION_REQUIRED.to_owned(),
        image_url: None,
    })
}
