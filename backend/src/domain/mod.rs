//! Domain primitives, services, and ports.
//!
//! Purpose: Define the strongly typed turn model, the academic catalogue,
//! and the services answering each turn. The domain is transport agnostic:
//! inbound adapters decode envelopes into [`TurnRequest`] values and relay
//! [`TurnResponse`] values; outbound adapters implement the traits in
//! [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): domain error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - TurnDispatcher (alias to `dispatcher::TurnDispatcher`): turn boundary.
//! - term_matcher: fuzzy matching of spoken input against vocabularies.

pub mod access_gate;
pub mod catalogue;
pub mod catalogue_service;
pub mod conversation;
pub mod credential;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod images;
pub mod ports;
pub mod registration;
pub mod speech;
pub mod term_matcher;
pub mod turn;
pub mod user;

pub use self::access_gate::{AccessGate, IdentityMode, ParseIdentityModeError};
pub use self::catalogue::{
    DateCatalogue, Instructor, Program, ProgramId, School, SchoolId, Subject, VocabularyQuery,
};
pub use self::catalogue_service::{CatalogueService, DynCatalogueService, VocabularyCacheConfig};
pub use self::conversation::{ConversationState, SessionAttributes};
pub use self::credential::{Credential, CredentialFingerprint, CredentialValidationError};
pub use self::dispatcher::{IntentRegistry, IntentRoute, TurnDispatcher};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::IdentityResolver;
pub use self::images::{ImageStore, screenshot_key};
pub use self::registration::RegistrationFlow;
pub use self::turn::{CallerIdentity, Card, RequestKind, TurnRequest, TurnResponse};
pub use self::user::{UserId, UserProfile, UserValidationError};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use campus_assistant::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::catalogue_miss("no such subject"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
