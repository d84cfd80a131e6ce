//! Turn routing.
//!
//! [`TurnDispatcher`] is the turn boundary: it picks the component that
//! answers a request and converts every failure into a spoken apology, so a
//! failed turn never affects other sessions.
//!
//! Routing order:
//! 1. launch, session-ended, stop, and cancel requests;
//! 2. registration, for `SignUpIntent` or any turn carrying state;
//! 3. the [`IntentRegistry`], gating personalised handlers;
//! 4. the reflector, which echoes unknown intent names.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::access_gate::AccessGate;
use crate::domain::catalogue_service::DynCatalogueService;
use crate::domain::handlers::{
    ContactHandler, ExamDatesHandler, FallbackHandler, GoodbyeHandler, HelpHandler,
    InstructorHandler, LaunchHandler, PersonalisedHandler, PublicHandler, ScheduleHandler,
    SubjectGuideHandler,
};
use crate::domain::ports::TurnService;
use crate::domain::registration::RegistrationFlow;
use crate::domain::speech::{self, titles};
use crate::domain::turn::intents;
use crate::domain::{
    Card, Error, ErrorCode, ImageStore, RequestKind, TurnRequest, TurnResponse,
};

/// Handler registered for an intent.
#[derive(Clone)]
pub enum IntentRoute {
    /// Answers anyone.
    Public(Arc<dyn PublicHandler>),
    /// Answers registered callers only, behind the access gate.
    Personalised(Arc<dyn PersonalisedHandler>),
}

/// Explicit intent name to handler mapping, filled at start-up.
#[derive(Clone, Default)]
pub struct IntentRegistry {
    routes: HashMap<String, IntentRoute>,
}

impl IntentRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every intent the assistant answers.
    pub fn standard(catalogue: &Arc<DynCatalogueService>, images: &ImageStore) -> Self {
        Self::new()
            .personalised(
                intents::SUBJECT,
                SubjectGuideHandler::new(Arc::clone(catalogue), images.clone()),
            )
            .personalised(intents::TEACHER, InstructorHandler::new(Arc::clone(catalogue)))
            .personalised(intents::SCHEDULE, ScheduleHandler::new(images.clone()))
            .personalised(intents::DATES, ExamDatesHandler::new(Arc::clone(catalogue)))
            .personalised(intents::CONTACT, ContactHandler::new(Arc::clone(catalogue)))
            .public(intents::HELP, HelpHandler)
            .public(intents::FALLBACK, FallbackHandler)
            .public(intents::STOP, GoodbyeHandler)
            .public(intents::CANCEL, GoodbyeHandler)
    }

    /// Register a handler available to every caller.
    pub fn public(mut self, intent: &str, handler: impl PublicHandler + 'static) -> Self {
        self.routes
            .insert(intent.to_owned(), IntentRoute::Public(Arc::new(handler)));
        self
    }

    /// Register a handler for registered callers.
    pub fn personalised(
        mut self,
        intent: &str,
        handler: impl PersonalisedHandler + 'static,
    ) -> Self {
        self.routes
            .insert(intent.to_owned(), IntentRoute::Personalised(Arc::new(handler)));
        self
    }

    /// Handler registered for `intent`.
    pub fn route(&self, intent: &str) -> Option<&IntentRoute> {
        self.routes.get(intent)
    }
}

/// Routes turns and converts failures into apologies.
pub struct TurnDispatcher {
    registry: IntentRegistry,
    gate: Arc<AccessGate>,
    registration: RegistrationFlow,
}

impl TurnDispatcher {
    /// Create a dispatcher.
    pub fn new(registry: IntentRegistry, gate: Arc<AccessGate>, registration: RegistrationFlow) -> Self {
        Self {
            registry,
            gate,
            registration,
        }
    }

    /// Answer one turn. Never fails.
    pub async fn dispatch(&self, request: &TurnRequest) -> TurnResponse {
        match self.route(request).await {
            Ok(response) => response,
            Err(err) => {
                log_failure(request, &err);
                apology()
            }
        }
    }

    async fn route(&self, request: &TurnRequest) -> Result<TurnResponse, Error> {
        let name = match &request.kind {
            RequestKind::Launch => return LaunchHandler.handle(request).await,
            RequestKind::SessionEnded => return GoodbyeHandler.handle(request).await,
            RequestKind::Intent { name } => name.as_str(),
        };

        if name == intents::STOP || name == intents::CANCEL {
            return GoodbyeHandler.handle(request).await;
        }
        if RegistrationFlow::claims(request) {
            return self.registration.advance(request).await;
        }

        match self.registry.route(name) {
            Some(IntentRoute::Public(handler)) => handler.handle(request).await,
            Some(IntentRoute::Personalised(handler)) => {
                self.gate.guard(request, handler.as_ref()).await
            }
            None => {
                info!(intent = name, session_id = %request.session_id, "no handler registered; reflecting intent");
                Ok(reflect(name))
            }
        }
    }
}

#[async_trait]
impl TurnService for TurnDispatcher {
    async fn handle_turn(&self, request: TurnRequest) -> TurnResponse {
        self.dispatch(&request).await
    }
}

fn reflect(intent: &str) -> TurnResponse {
    let text = speech::reflected_intent(intent);
    closing(&text)
}

fn apology() -> TurnResponse {
    closing(speech::APOLOGY)
}

fn closing(text: &str) -> TurnResponse {
    TurnResponse::speak(text)
        .with_card(Card {
            title: titles::ERROR.to_owned(),
            body: text.to_owned(),
            image_url: None,
        })
        .ending_session()
}

fn log_failure(request: &TurnRequest, err: &Error) {
    let intent = request.intent_name().unwrap_or("-");
    let user = err
        .caller()
        .or(request.identity.user_id.as_deref())
        .unwrap_or("-");
    let details = err.details().map(ToString::to_string).unwrap_or_default();
    match err.code() {
        ErrorCode::CatalogueMiss | ErrorCode::IdentityUnresolved | ErrorCode::InvalidRequest => {
            warn!(
                session_id = %request.session_id,
                intent,
                user,
                slots = ?request.slots,
                code = ?err.code(),
                details = %details,
                error = %err,
                "turn failed"
            );
        }
        _ => {
            error!(
                session_id = %request.session_id,
                intent,
                user,
                slots = ?request.slots,
                code = ?err.code(),
                details = %details,
                error = %err,
                "turn failed"
            );
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
