//! Domain-level error types.
//!
//! These errors are transport agnostic. The turn dispatcher converts them
//! into spoken apologies; the HTTP adapter maps the few that escape a turn
//! (malformed envelopes) onto JSON responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::domain::UserId;

/// Details key naming the caller a failed turn was serving.
const CALLER_KEY: &str = "userId";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or misses a value the turn needs.
    InvalidRequest,
    /// The caller could not be mapped to a stable user identifier.
    IdentityUnresolved,
    /// The fuzzy matcher was handed an empty vocabulary.
    NoMatch,
    /// A catalogue entry the turn relies on is missing or incomplete.
    CatalogueMiss,
    /// A backing store or provider is temporarily unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use campus_assistant::domain::{Error, ErrorCode};
///
/// let err = Error::catalogue_miss("subject has no syllabus");
/// assert_eq!(err.code(), ErrorCode::CatalogueMiss);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "Something went wrong")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create a new error, substituting a generic message when blank.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self {
            code,
            message: "unspecified error".to_owned(),
            details: None,
        })
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message for logs and adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use campus_assistant::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("missing slot")
    ///     .with_details(json!({ "slot": "SubjectSlot" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Record the resolved caller in the details.
    ///
    /// Existing object details keep their keys; any other value moves under
    /// `context`.
    ///
    /// # Examples
    /// ```
    /// use campus_assistant::domain::{Error, UserId};
    ///
    /// let user = UserId::new("amzn1.account.ada").expect("valid id");
    /// let err = Error::catalogue_miss("subject has no syllabus").with_caller(&user);
    /// assert_eq!(err.caller(), Some("amzn1.account.ada"));
    /// ```
    pub fn with_caller(mut self, user_id: &UserId) -> Self {
        let mut details = match self.details.take() {
            Some(Value::Object(map)) => map,
            Some(other) => Map::from_iter([("context".to_owned(), other)]),
            None => Map::new(),
        };
        details.insert(
            CALLER_KEY.to_owned(),
            Value::String(user_id.as_ref().to_owned()),
        );
        self.details = Some(Value::Object(details));
        self
    }

    /// Caller recorded by [`Error::with_caller`], if any.
    pub fn caller(&self) -> Option<&str> {
        self.details.as_ref()?.get(CALLER_KEY)?.as_str()
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::IdentityUnresolved`].
    pub fn identity_unresolved(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IdentityUnresolved, message)
    }

    /// Convenience constructor for [`ErrorCode::NoMatch`].
    pub fn no_match(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoMatch, message)
    }

    /// Convenience constructor for [`ErrorCode::CatalogueMiss`].
    pub fn catalogue_miss(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CatalogueMiss, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            details,
        } = value;

        let mut error = Error::try_new(code, message)?;
        error.details = details;
        Ok(error)
    }
}
