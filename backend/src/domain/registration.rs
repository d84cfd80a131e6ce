//! Three-step registration conversation.
//!
//! ```text
//! None --(list schools)--> AwaitingSchool --(match school, list its programs)-->
//!     AwaitingProgram { school } --(match program, upsert profile)--> None
//! ```
//!
//! The step travels in the response's conversation state; the flow keeps
//! nothing between turns. Answers after the first step arrive in the
//! `TextSlot` of a `SignUpIntent`. A `SignUpIntent` without that slot starts
//! over, so saying "Registro" mid-flow restarts registration. A stored
//! school that no longer offers any program also starts over.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::access_gate::{AccessGate, map_profile_error};
use crate::domain::catalogue_service::DynCatalogueService;
use crate::domain::ports::UserProfileRepository;
use crate::domain::speech::{self, titles};
use crate::domain::turn::{intents, slots};
use crate::domain::{
    Card, ConversationState, Error, SchoolId, TurnRequest, TurnResponse, UserProfile,
    VocabularyQuery,
};

/// Drives the registration conversation.
pub struct RegistrationFlow {
    catalogue: Arc<DynCatalogueService>,
    gate: Arc<AccessGate>,
    profiles: Arc<dyn UserProfileRepository>,
}

impl RegistrationFlow {
    /// Create the flow.
    pub fn new(
        catalogue: Arc<DynCatalogueService>,
        gate: Arc<AccessGate>,
        profiles: Arc<dyn UserProfileRepository>,
    ) -> Self {
        Self {
            catalogue,
            gate,
            profiles,
        }
    }

    /// Whether this turn belongs to the registration conversation.
    pub fn claims(request: &TurnRequest) -> bool {
        request.intent_name() == Some(intents::SIGN_UP) || !request.conversation_state.is_empty()
    }

    /// Advance the conversation by one turn.
    pub async fn advance(&self, request: &TurnRequest) -> Result<TurnResponse, Error> {
        let restart =
            request.intent_name() == Some(intents::SIGN_UP) && request.slot(slots::TEXT).is_none();
        let state = if restart {
            ConversationState::None
        } else {
            ConversationState::from_attributes(&request.conversation_state)
        };

        match state {
            ConversationState::None => self.offer_schools().await,
            ConversationState::AwaitingSchool => self.choose_school(request).await,
            ConversationState::AwaitingProgram { school } => {
                self.choose_program(request, &school).await
            }
        }
    }

    async fn offer_schools(&self) -> Result<TurnResponse, Error> {
        let schools = self.catalogue.vocabulary(&VocabularyQuery::Schools).await?;
        let text = speech::ask_school(&schools);
        Ok(step(text).with_state(&ConversationState::AwaitingSchool))
    }

    async fn choose_school(&self, request: &TurnRequest) -> Result<TurnResponse, Error> {
        let spoken = request.require_slot(slots::TEXT)?;
        let school = SchoolId::new(
            self.catalogue
                .resolve(spoken, &VocabularyQuery::Schools)
                .await?,
        );
        let programs = self
            .catalogue
            .vocabulary(&VocabularyQuery::Programs {
                school: school.clone(),
            })
            .await?;

        let text = speech::ask_program(school.as_ref(), &programs);
        Ok(step(text).with_state(&ConversationState::AwaitingProgram { school }))
    }

    async fn choose_program(
        &self,
        request: &TurnRequest,
        school: &SchoolId,
    ) -> Result<TurnResponse, Error> {
        let query = VocabularyQuery::Programs {
            school: school.clone(),
        };
        if self.catalogue.vocabulary(&query).await?.is_empty() {
            warn!(
                %school,
                session_id = %request.session_id,
                "stored school offers no programs; restarting registration"
            );
            return self.offer_schools().await;
        }

        let spoken = request.require_slot(slots::TEXT)?;
        let name = self.catalogue.resolve(spoken, &query).await?;
        let program = self.catalogue.program_named(school, &name).await?;

        let user_id = self.gate.identify(request).await?;
        let profile = UserProfile::new(user_id, program.id.clone());
        self.profiles
            .upsert(&profile)
            .await
            .map_err(|err| map_profile_error(err).with_caller(&profile.user_id))?;
        info!(
            user_id = %profile.user_id,
            program = %profile.program,
            session_id = %request.session_id,
            "registration committed"
        );

        let text = speech::registered(&program.name, program.id.as_ref());
        Ok(step(text))
    }
}

fn step(text: String) -> TurnResponse {
    let card = Card {
        title: titles::REGISTRATION.to_owned(),
        body: text.clone(),
        image_url: None,
    };
    TurnResponse::speak(text).with_card(card)
}

#[cfg(test)]
#[path = "registration_tests.rs"]
mod tests;
