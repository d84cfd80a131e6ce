//! Intent handlers.
//!
//! Handlers come in two flavours. [`PublicHandler`]s answer anyone.
//! [`PersonalisedHandler`]s answer registered users only and receive the
//! caller's profile through a [`TurnContext`] built by the access gate.

use async_trait::async_trait;

use crate::domain::{Error, TurnRequest, TurnResponse, UserId, UserProfile};

mod personalised;
mod public;

pub use personalised::{
    ContactHandler, ExamDatesHandler, InstructorHandler, ScheduleHandler, SubjectGuideHandler,
};
pub use public::{FallbackHandler, GoodbyeHandler, HelpHandler, LaunchHandler};

/// Facts established about the caller before a personalised handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnContext {
    /// Resolved caller.
    pub user_id: UserId,
    /// The caller's registration.
    pub profile: UserProfile,
}

/// Handler available to every caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublicHandler: Send + Sync {
    /// Answer the turn.
    async fn handle(&self, request: &TurnRequest) -> Result<TurnResponse, Error>;
}

/// Handler that needs a registered caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonalisedHandler: Send + Sync {
    /// Answer the turn for the caller described by `context`.
    async fn handle(
        &self,
        request: &TurnRequest,
        context: &TurnContext,
    ) -> Result<TurnResponse, Error>;
}
