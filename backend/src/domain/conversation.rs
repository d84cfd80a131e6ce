//! Registration conversation state carried between turns.
//!
//! The server keeps no per-session memory. The state travels to the
//! dispatcher in every response as a flat attribute map and comes back
//! verbatim on the next turn.

use std::collections::BTreeMap;

use tracing::warn;

use super::catalogue::SchoolId;

/// Attribute key holding the current registration step.
pub const STEP_ATTRIBUTE: &str = "registrationStep";
/// Attribute key holding the school chosen in the first step.
pub const SCHOOL_ATTRIBUTE: &str = "school";

const AWAITING_SCHOOL: &str = "awaitingSchool";
const AWAITING_PROGRAM: &str = "awaitingProgram";

/// Flat attribute map exchanged with the dispatcher.
pub type SessionAttributes = BTreeMap<String, String>;

/// Step of the registration conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConversationState {
    /// No registration in progress.
    #[default]
    None,
    /// The school list was offered; the next turn names a school.
    AwaitingSchool,
    /// The program list for `school` was offered; the next turn names a program.
    AwaitingProgram {
        /// School resolved in the previous turn.
        school: SchoolId,
    },
}

impl ConversationState {
    /// Decode the state from session attributes.
    ///
    /// Unknown steps, or an `awaitingProgram` step without a school, decode
    /// as [`ConversationState::None`] so registration restarts instead of
    /// failing the turn.
    ///
    /// # Examples
    /// ```
    /// use campus_assistant::domain::{ConversationState, SessionAttributes};
    ///
    /// let mut attributes = SessionAttributes::new();
    /// attributes.insert("registrationStep".into(), "awaitingSchool".into());
    /// assert_eq!(
    ///     ConversationState::from_attributes(&attributes),
    ///     ConversationState::AwaitingSchool
    /// );
    /// ```
    pub fn from_attributes(attributes: &SessionAttributes) -> Self {
        if attributes.is_empty() {
            return Self::None;
        }
        let step = attributes.get(STEP_ATTRIBUTE).map(String::as_str);
        let school = attributes
            .get(SCHOOL_ATTRIBUTE)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty());

        match (step, school) {
            (Some(AWAITING_SCHOOL), _) => Self::AwaitingSchool,
            (Some(AWAITING_PROGRAM), Some(school)) => Self::AwaitingProgram {
                school: SchoolId::new(school),
            },
            _ => {
                warn!(?attributes, "malformed conversation state; restarting registration");
                Self::None
            }
        }
    }

    /// Encode the state as session attributes.
    pub fn to_attributes(&self) -> SessionAttributes {
        let mut attributes = SessionAttributes::new();
        match self {
            Self::None => {}
            Self::AwaitingSchool => {
                attributes.insert(STEP_ATTRIBUTE.to_owned(), AWAITING_SCHOOL.to_owned());
            }
            Self::AwaitingProgram { school } => {
                attributes.insert(STEP_ATTRIBUTE.to_owned(), AWAITING_PROGRAM.to_owned());
                attributes.insert(SCHOOL_ATTRIBUTE.to_owned(), school.to_string());
            }
        }
        attributes
    }
}
