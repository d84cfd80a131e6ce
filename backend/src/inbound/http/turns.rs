//! Conversational turn endpoint.
//!
//! ```text
//! POST /api/v1/turns
//! {"sessionId":"s-1","requestType":"intent","intent":"SubjectIntent",
//!  "accessToken":"tok","slots":{"SubjectSlot":"redes"}}
//! ```
//!
//! Every decodable envelope is answered with `200`; failures inside the turn
//! come back as spoken apologies. Only envelopes that cannot be decoded are
//! rejected with `400`.

use std::collections::BTreeMap;

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    CallerIdentity, Card, Credential, Error, RequestKind, SessionAttributes, TurnRequest,
    TurnResponse,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Kind of request the voice platform forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestTypeDto {
    /// The user opened the assistant.
    Launch,
    /// The user said something mapped to an intent.
    Intent,
    /// The platform closed the session.
    SessionEnded,
}

/// Request envelope for `POST /api/v1/turns`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequestDto {
    /// Platform session identifier.
    #[schema(example = "amzn1.echo-api.session.1")]
    pub session_id: String,
    /// Request kind.
    pub request_type: RequestTypeDto,
    /// Intent name; required when `requestType` is `intent`.
    #[serde(default)]
    #[schema(example = "SubjectIntent")]
    pub intent: Option<String>,
    /// Rotating access credential, when account linking is enabled.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Stable user identifier supplied by the platform.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Attributes returned by the previous turn.
    #[serde(default)]
    pub conversation_state: BTreeMap<String, String>,
    /// Slot values already extracted from speech.
    #[serde(default)]
    pub slots: BTreeMap<String, String>,
}

impl TryFrom<TurnRequestDto> for TurnRequest {
    type Error = Error;

    fn try_from(dto: TurnRequestDto) -> Result<Self, Self::Error> {
        let session_id = dto.session_id.trim();
        if session_id.is_empty() {
            return Err(invalid_field("sessionId", "session id must not be empty"));
        }

        let kind = match dto.request_type {
            RequestTypeDto::Launch => RequestKind::Launch,
            RequestTypeDto::SessionEnded => RequestKind::SessionEnded,
            RequestTypeDto::Intent => {
                let name = dto
                    .intent
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| invalid_field("intent", "intent requests need an intent name"))?;
                RequestKind::Intent {
                    name: name.to_owned(),
                }
            }
        };

        let access_token = dto
            .access_token
            .filter(|token| !token.trim().is_empty())
            .map(Credential::new)
            .transpose()
            .map_err(|err| invalid_field("accessToken", err.to_string()))?;
        let user_id = dto.user_id.filter(|id| !id.trim().is_empty());

        Ok(Self {
            session_id: session_id.to_owned(),
            kind,
            identity: CallerIdentity {
                access_token,
                user_id,
            },
            conversation_state: dto.conversation_state,
            slots: dto.slots,
        })
    }
}

fn invalid_field(field: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field }))
}

/// Visual card attached to a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardDto {
    /// Card title.
    pub title: String,
    /// Card body.
    pub body: String,
    /// Image shown on the card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<Card> for CardDto {
    fn from(card: Card) -> Self {
        Self {
            title: card.title,
            body: card.body,
            image_url: card.image_url,
        }
    }
}

/// Response payload for `POST /api/v1/turns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponseDto {
    /// Text to speak.
    #[schema(example = "Hasta luego")]
    pub speech: String,
    /// Optional card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardDto>,
    /// Whether the platform should close the session.
    pub should_end_session: bool,
    /// Attributes to send back with the next turn.
    pub conversation_state: SessionAttributes,
}

impl From<TurnResponse> for TurnResponseDto {
    fn from(response: TurnResponse) -> Self {
        Self {
            speech: response.speech,
            card: response.card.map(CardDto::from),
            should_end_session: response.should_end_session,
            conversation_state: response.conversation_state,
        }
    }
}

/// JSON extractor configuration rejecting undecodable bodies with the
/// domain error payload.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed turn envelope: {err}")).into()
    })
}

/// Answer one conversational turn.
#[utoipa::path(
    post,
    path = "/api/v1/turns",
    request_body = TurnRequestDto,
    responses(
        (status = 200, description = "Turn answered", body = TurnResponseDto),
        (status = 400, description = "Envelope could not be decoded", body = Error)
    ),
    tags = ["turns"],
    operation_id = "postTurn"
)]
#[post("/turns")]
pub async fn post_turn(
    state: web::Data<HttpState>,
    payload: web::Json<TurnRequestDto>,
) -> ApiResult<web::Json<TurnResponseDto>> {
    let request = TurnRequest::try_from(payload.into_inner())?;
    let response = state.turns.handle_turn(request).await;
    Ok(web::Json(response.into()))
}

#[cfg(test)]
#[path = "turns_tests.rs"]
mod tests;
