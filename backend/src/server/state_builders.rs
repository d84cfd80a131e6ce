//! Builders wiring adapters into the turn dispatcher.

use std::io;
use std::sync::Arc;

use actix_web::web;

use campus_assistant::domain::ports::{
    CatalogueRepository, IdentityProvider, UserProfileRepository,
};
use campus_assistant::domain::{
    AccessGate, CatalogueService, DynCatalogueService, IdentityResolver, IntentRegistry,
    RegistrationFlow, TurnDispatcher,
};
use campus_assistant::inbound::http::state::HttpState;
use campus_assistant::outbound::identity::HttpIdentityProvider;
use campus_assistant::outbound::memory::{InMemoryCatalogue, InMemoryUserProfiles};
use campus_assistant::outbound::persistence::{
    DieselCatalogueRepository, DieselUserProfileRepository,
};
use tracing::info;

use super::ServerConfig;

type Repositories = (Arc<dyn CatalogueRepository>, Arc<dyn UserProfileRepository>);

/// Choose database-backed repositories when a pool is available, otherwise
/// the fixture snapshot and an in-process profile store.
fn build_repositories(config: &ServerConfig) -> io::Result<Repositories> {
    build_repositories_with_pool(&config.db_pool, config, |pool| {
        (
            Arc::new(DieselCatalogueRepository::new(pool.clone())),
            Arc::new(DieselUserProfileRepository::new(pool.clone())),
        )
    })
}

fn build_repositories_with_pool<Pool>(
    pool: &Option<Pool>,
    config: &ServerConfig,
    make_repositories: impl FnOnce(&Pool) -> Repositories,
) -> io::Result<Repositories> {
    match pool {
        Some(pool) => {
            info!("serving catalogue and profiles from PostgreSQL");
            Ok(make_repositories(pool))
        }
        None => {
            let catalogue = InMemoryCatalogue::from_json_file(&config.catalogue_fixture)
                .map_err(io::Error::other)?;
            info!("serving catalogue from fixture and profiles from memory");
            Ok((Arc::new(catalogue), Arc::new(InMemoryUserProfiles::new())))
        }
    }
}

fn build_identity_provider(config: &ServerConfig) -> io::Result<Arc<dyn IdentityProvider>> {
    let provider =
        HttpIdentityProvider::new(config.identity_endpoint.clone(), config.identity_timeout)
            .map_err(|err| io::Error::other(format!("identity client setup failed: {err}")))?;
    Ok(Arc::new(provider))
}

/// Assemble the dispatcher from explicit ports.
fn build_dispatcher(
    config: &ServerConfig,
    repositories: Repositories,
    provider: Arc<dyn IdentityProvider>,
) -> TurnDispatcher {
    let (catalogue_repository, profiles) = repositories;
    let catalogue: Arc<DynCatalogueService> = Arc::new(CatalogueService::new(
        catalogue_repository,
        config.vocabulary_cache,
    ));
    let resolver = Arc::new(IdentityResolver::new(provider));
    let gate = Arc::new(AccessGate::new(
        config.identity_mode,
        resolver,
        Arc::clone(&profiles),
    ));
    let registration = RegistrationFlow::new(Arc::clone(&catalogue), Arc::clone(&gate), profiles);
    let registry = IntentRegistry::standard(&catalogue, &config.images);
    TurnDispatcher::new(registry, gate, registration)
}

/// Build the shared HTTP state.
///
/// # Errors
///
/// Propagates fixture loading and HTTP client construction failures.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let repositories = build_repositories(config)?;
    let provider = build_identity_provider(config)?;
    let dispatcher = build_dispatcher(config, repositories, provider);
    info!(mode = %config.identity_mode, "turn dispatcher ready");
    Ok(web::Data::new(HttpState::new(Arc::new(dispatcher))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    use async_trait::async_trait;
    use campus_assistant::domain::ports::{FixtureIdentityProvider, UserProfileRepositoryError};
    use campus_assistant::domain::speech;
    use campus_assistant::domain::turn::intents;
    use campus_assistant::domain::{
        IdentityMode, ImageStore, ProgramId, RequestKind, TurnRequest, UserId, UserProfile,
        VocabularyCacheConfig,
    };
    use rstest::{fixture, rstest};
    use url::Url;

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("catalogue.json")
    }

    #[fixture]
    fn config() -> ServerConfig {
        ServerConfig {
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            db_pool: None,
            catalogue_fixture: fixture_path(),
            identity_mode: IdentityMode::SessionUser,
            identity_endpoint: Url::parse("http://127.0.0.1:9/profile").expect("url"),
            identity_timeout: Duration::from_millis(100),
            images: ImageStore::default(),
            vocabulary_cache: VocabularyCacheConfig::default(),
        }
    }

    /// Profile store that knows a single registered caller.
    struct OneProfile;

    #[async_trait]
    impl UserProfileRepository for OneProfile {
        async fn find_by_id(
            &self,
            id: &UserId,
        ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
            Ok((id.as_ref() == "db-user")
                .then(|| UserProfile::new(id.clone(), ProgramId::new("GITST"))))
        }

        async fn upsert(&self, _profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
            Ok(())
        }
    }

    #[rstest]
    #[tokio::test]
    async fn pool_absent_serves_the_fixture_snapshot(config: ServerConfig) {
        let (catalogue, profiles) =
            build_repositories_with_pool::<()>(&None, &config, |_| unreachable!())
                .expect("fixture loads");

        let program = catalogue
            .find_program(&ProgramId::new("GITST"))
            .await
            .expect("lookup");
        assert!(program.is_some());
        let user = UserId::new("nobody").expect("id");
        assert!(profiles.find_by_id(&user).await.expect("lookup").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn pool_present_selects_database_repositories(config: ServerConfig) {
        let (_, profiles) = build_repositories_with_pool(&Some(()), &config, |_| {
            (
                Arc::new(InMemoryCatalogue::default()),
                Arc::new(OneProfile),
            )
        })
        .expect("repositories");

        let user = UserId::new("db-user").expect("id");
        assert!(profiles.find_by_id(&user).await.expect("lookup").is_some());
    }

    #[rstest]
    fn missing_fixture_fails_startup(mut config: ServerConfig) {
        config.catalogue_fixture = PathBuf::from("/nonexistent/catalogue.json");
        assert!(build_http_state(&config).is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn wired_dispatcher_answers_launch_and_gates_topics(config: ServerConfig) {
        let repositories = build_repositories(&config).expect("fixture loads");
        let dispatcher = build_dispatcher(&config, repositories, Arc::new(FixtureIdentityProvider));

        let launch = dispatcher
            .dispatch(&TurnRequest::new("s", RequestKind::Launch))
            .await;
        assert_eq!(launch.speech, speech::WELCOME);

        let gated = dispatcher
            .dispatch(&TurnRequest::intent("s", intents::CONTACT).with_user_id("stranger"))
            .await;
        assert_eq!(gated.speech, speech::REGISTRATION_REQUIRED);
    }
}
