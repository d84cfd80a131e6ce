//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the turn endpoint, the health probes, and the
//! envelope schemas. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::turns::{CardDto, RequestTypeDto, TurnRequestDto, TurnResponseDto};

/// OpenAPI document for the HTTP interface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus assistant API",
        description = "Turn endpoint for the university voice assistant and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::turns::post_turn,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        TurnRequestDto,
        TurnResponseDto,
        CardDto,
        RequestTypeDto,
        Error,
        ErrorCode
    )),
    tags(
        (name = "turns", description = "Conversational turns"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
