//! Driving port for answering conversational turns.
//!
//! Inbound adapters hand each decoded envelope to a [`TurnService`] and
//! relay whatever it answers. The service never fails: errors are turned
//! into spoken apologies inside the domain.

use async_trait::async_trait;

use crate::domain::speech;
use crate::domain::{TurnRequest, TurnResponse};

/// Port answering one turn.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TurnService: Send + Sync {
    /// Answer `request`.
    async fn handle_turn(&self, request: TurnRequest) -> TurnResponse;
}

/// Fixture service that answers every turn with the fallback phrase.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTurnService;

#[async_trait]
impl TurnService for FixtureTurnService {
    async fn handle_turn(&self, _request: TurnRequest) -> TurnResponse {
        TurnResponse::speak(speech::FALLBACK)
    }
}
