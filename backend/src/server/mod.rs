//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use campus_assistant::Trace;
#[cfg(debug_assertions)]
use campus_assistant::doc::ApiDoc;
use campus_assistant::inbound::http::health::{HealthState, live, ready};
use campus_assistant::inbound::http::state::HttpState;
use campus_assistant::inbound::http::turns::{json_config, post_turn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .app_data(json_config())
        .service(post_turn);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Readiness is reported once every adapter is built and the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when an adapter cannot be built or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(config.bind_addr())?
        .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test;
    use async_trait::async_trait;
    use campus_assistant::domain::ports::TurnService;
    use campus_assistant::domain::{TurnRequest, TurnResponse};
    use rstest::rstest;
    use serde_json::{Value, json};

    struct Echo;

    #[async_trait]
    impl TurnService for Echo {
        async fn handle_turn(&self, request: TurnRequest) -> TurnResponse {
            TurnResponse::speak(request.session_id)
        }
    }

    fn states() -> (web::Data<HealthState>, web::Data<HttpState>) {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        (health, web::Data::new(HttpState::new(Arc::new(Echo))))
    }

    #[rstest]
    #[actix_rt::test]
    async fn turns_are_served_under_the_api_scope() {
        let (health, http) = states();
        let app = test::init_service(build_app(health, http)).await;

        let request = test::TestRequest::post()
            .uri("/api/v1/turns")
            .set_json(json!({ "sessionId": "abc", "requestType": "launch" }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("trace-id"));
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["speech"], "abc");
    }

    #[rstest]
    #[actix_rt::test]
    async fn malformed_turns_get_the_error_envelope() {
        let (health, http) = states();
        let app = test::init_service(build_app(health, http)).await;

        let request = test::TestRequest::post()
            .uri("/api/v1/turns")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
    }

    #[rstest]
    #[actix_rt::test]
    async fn create_server_marks_ready_once_bound() {
        use std::path::PathBuf;
        use std::time::Duration;

        use campus_assistant::domain::{IdentityMode, ImageStore, VocabularyCacheConfig};

        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            db_pool: None,
            catalogue_fixture: PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("fixtures")
                .join("catalogue.json"),
            identity_mode: IdentityMode::Credential,
            identity_endpoint: url::Url::parse("http://127.0.0.1:9/profile").expect("url"),
            identity_timeout: Duration::from_millis(100),
            images: ImageStore::default(),
            vocabulary_cache: VocabularyCacheConfig::default(),
        };
        let health = web::Data::new(HealthState::new());

        assert!(!health.is_ready(), "state should start unready");

        let _server = create_server(health.clone(), config).expect("server starts");

        assert!(health.is_ready(), "server creation should mark readiness");
    }

    #[rstest]
    #[actix_rt::test]
    async fn probes_are_mounted_at_the_root() {
        let (health, http) = states();
        let app = test::init_service(build_app(health, http)).await;

        let request = test::TestRequest::get().uri("/health/ready").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
