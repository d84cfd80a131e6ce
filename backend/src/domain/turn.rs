//! Request envelope and response payload of one conversational turn.

use std::collections::BTreeMap;

use serde_json::json;

use super::conversation::{ConversationState, SessionAttributes};
use super::error::Error;

/// Intent names understood by the assistant.
pub mod intents {
    /// Starts or restarts registration.
    pub const SIGN_UP: &str = "SignUpIntent";
    /// Syllabus of a subject.
    pub const SUBJECT: &str = "SubjectIntent";
    /// Instructor responsible for a subject.
    pub const TEACHER: &str = "TeacherIntent";
    /// Timetable of a year.
    pub const SCHEDULE: &str = "ScheduleIntent";
    /// Calendar entries of the user's program.
    pub const DATES: &str = "DatesIntent";
    /// Contact channels of the user's school office.
    pub const CONTACT: &str = "ContactIntent";
    /// Built-in help request.
    pub const HELP: &str = "AMAZON.HelpIntent";
    /// Built-in cancel request.
    pub const CANCEL: &str = "AMAZON.CancelIntent";
    /// Built-in stop request.
    pub const STOP: &str = "AMAZON.StopIntent";
    /// Built-in fallback for unrecognised utterances.
    pub const FALLBACK: &str = "AMAZON.FallbackIntent";
}

/// Slot names carried by the intents above.
pub mod slots {
    /// Free text answer during registration.
    pub const TEXT: &str = "TextSlot";
    /// Subject name.
    pub const SUBJECT: &str = "SubjectSlot";
    /// Year of study.
    pub const YEAR: &str = "YearSlot";
    /// Calendar category.
    pub const DATE: &str = "DateSlot";
}

/// What kind of turn the dispatcher delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// The user opened the assistant without asking anything.
    Launch,
    /// The user asked for a named intent.
    Intent {
        /// Intent name, e.g. `SubjectIntent`.
        name: String,
    },
    /// The dispatcher closed the session.
    SessionEnded,
}

/// Caller identity as supplied by the dispatcher.
///
/// Depending on the protocol either a rotating credential or a stable
/// per-session user id is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Per-session access token.
    pub access_token: Option<super::Credential>,
    /// Stable user id supplied by the dispatcher.
    pub user_id: Option<String>,
}

/// One inbound turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    /// Dispatcher session identifier, used for log correlation.
    pub session_id: String,
    /// Request kind.
    pub kind: RequestKind,
    /// Caller identity.
    pub identity: CallerIdentity,
    /// Attributes handed back from the previous turn.
    pub conversation_state: SessionAttributes,
    /// Slot name to raw spoken value.
    pub slots: BTreeMap<String, String>,
}

impl TurnRequest {
    /// Build an intent turn with no identity, state, or slots.
    ///
    /// # Examples
    /// ```
    /// use campus_assistant::domain::TurnRequest;
    ///
    /// let request = TurnRequest::intent("session-1", "SubjectIntent")
    ///     .with_slot("SubjectSlot", "internet");
    /// assert_eq!(request.intent_name(), Some("SubjectIntent"));
    /// assert_eq!(request.slot("SubjectSlot"), Some("internet"));
    /// ```
    pub fn intent(session_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(session_id, RequestKind::Intent { name: name.into() })
    }

    /// Build a turn of the given kind with no identity, state, or slots.
    pub fn new(session_id: impl Into<String>, kind: RequestKind) -> Self {
        Self {
            session_id: session_id.into(),
            kind,
            identity: CallerIdentity::default(),
            conversation_state: SessionAttributes::new(),
            slots: BTreeMap::new(),
        }
    }

    /// Attach a slot value.
    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(name.into(), value.into());
        self
    }

    /// Attach a credential.
    pub fn with_credential(mut self, credential: super::Credential) -> Self {
        self.identity.access_token = Some(credential);
        self
    }

    /// Attach a dispatcher-supplied user id.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.identity.user_id = Some(user_id.into());
        self
    }

    /// Attach conversation state from a previous turn.
    pub fn with_state(mut self, state: &ConversationState) -> Self {
        self.conversation_state = state.to_attributes();
        self
    }

    /// Intent name for intent turns.
    pub fn intent_name(&self) -> Option<&str> {
        match &self.kind {
            RequestKind::Intent { name } => Some(name.as_str()),
            RequestKind::Launch | RequestKind::SessionEnded => None,
        }
    }

    /// Trimmed slot value, `None` when absent or blank.
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Trimmed slot value, or an [`Error::invalid_request`] naming the slot.
    pub fn require_slot(&self, name: &str) -> Result<&str, Error> {
        self.slot(name).ok_or_else(|| {
            Error::invalid_request("required slot is missing").with_details(json!({ "slot": name }))
        })
    }
}

/// Visual supplement to the spoken answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Card title.
    pub title: String,
    /// Card body text.
    pub body: String,
    /// Image shown on the card, when pre-rendered.
    pub image_url: Option<String>,
}

/// Answer to one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResponse {
    /// Text to speak.
    pub speech: String,
    /// Optional card.
    pub card: Option<Card>,
    /// Whether the dispatcher should close the session.
    pub should_end_session: bool,
    /// Attributes to hand back on the next turn.
    pub conversation_state: SessionAttributes,
}

impl TurnResponse {
    /// Speak `speech` and keep the session open with cleared state.
    pub fn speak(speech: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            card: None,
            should_end_session: false,
            conversation_state: SessionAttributes::new(),
        }
    }

    /// Attach a card.
    pub fn with_card(mut self, card: Card) -> Self {
        self.card = Some(card);
        self
    }

    /// Carry `state` into the next turn.
    pub fn with_state(mut self, state: &ConversationState) -> Self {
        self.conversation_state = state.to_attributes();
        self
    }

    /// Close the session after this answer.
    pub fn ending_session(mut self) -> Self {
        self.should_end_session = true;
        self
    }

    /// Decoded conversation state carried by this response.
    pub fn next_state(&self) -> ConversationState {
        ConversationState::from_attributes(&self.conversation_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, SchoolId};
    use rstest::rstest;

    #[rstest]
    #[case::absent(None)]
    #[case::blank(Some("   "))]
    fn missing_slot_is_invalid_request(#[case] value: Option<&str>) {
        let mut request = TurnRequest::intent("s", intents::SUBJECT);
        if let Some(value) = value {
            request = request.with_slot(slots::SUBJECT, value);
        }
        let err = request.require_slot(slots::SUBJECT).expect_err("slot missing");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details(), Some(&json!({ "slot": "SubjectSlot" })));
    }

    #[rstest]
    fn slot_values_are_trimmed() {
        let request = TurnRequest::intent("s", intents::SUBJECT).with_slot(slots::SUBJECT, " redes ");
        assert_eq!(request.slot(slots::SUBJECT), Some("redes"));
    }

    #[rstest]
    #[case::launch(RequestKind::Launch)]
    #[case::ended(RequestKind::SessionEnded)]
    fn non_intent_turns_have_no_intent_name(#[case] kind: RequestKind) {
        assert_eq!(TurnRequest::new("s", kind).intent_name(), None);
    }

    #[rstest]
    fn response_carries_state_and_closing_flag() {
        let state = ConversationState::AwaitingProgram {
            school: SchoolId::new("ETSIT"),
        };
        let response = TurnResponse::speak("hola").with_state(&state);
        assert_eq!(response.next_state(), state);
        assert!(!response.should_end_session);
        assert!(response.ending_session().should_end_session);
    }
}
