//! Handlers that answer without a registration.

use async_trait::async_trait;

use super::PublicHandler;
use crate::domain::speech::{self, titles};
use crate::domain::{Card, Error, TurnRequest, TurnResponse};

fn answer(title: &str, text: &str) -> TurnResponse {
    TurnResponse::speak(text).with_card(Card {
        title: title.to_owned(),
        body: text.to_owned(),
        image_url: None,
    })
}

/// Welcomes the user and lists the topics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LaunchHandler;

#[async_trait]
impl PublicHandler for LaunchHandler {
    async fn handle(&self, _request: &TurnRequest) -> Result<TurnResponse, Error> {
        Ok(answer(titles::WELCOME, speech::WELCOME))
    }
}

/// Lists the available options.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelpHandler;

#[async_trait]
impl PublicHandler for HelpHandler {
    async fn handle(&self, _request: &TurnRequest) -> Result<TurnResponse, Error> {
        Ok(answer(titles::HELP, speech::HELP))
    }
}

/// Points the user at the help intent.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackHandler;

#[async_trait]
impl PublicHandler for FallbackHandler {
    async fn handle(&self, _request: &TurnRequest) -> Result<TurnResponse, Error> {
        Ok(answer(titles::ERROR, speech::FALLBACK))
    }
}

/// Says goodbye, closes the session, and drops any registration in progress.
///
/// Serves stop and cancel intents as well as session-ended requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoodbyeHandler;

#[async_trait]
impl PublicHandler for GoodbyeHandler {
    async fn handle(&self, _request: &TurnRequest) -> Result<TurnResponse, Error> {
        Ok(answer(titles::CLOSING, speech::GOODBYE).ending_session())
    }
}
