//! In-memory assistant wiring shared by the behaviour tests.
//!
//! Builds the real dispatcher over the in-memory adapters and a scripted
//! identity provider, so scenarios exercise the same composition the server
//! uses without a database or network.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use campus_assistant::domain::ports::{
    CatalogueRepository, IdentityProvider, IdentityProviderError, UserProfileRepository,
};
use campus_assistant::domain::{
    AccessGate, CatalogueService, Credential, DateCatalogue, DynCatalogueService, IdentityMode,
    IdentityResolver, ImageStore, Instructor, IntentRegistry, Program, ProgramId,
    RegistrationFlow, School, SchoolId, Subject, TurnDispatcher, TurnRequest, TurnResponse,
    UserId, UserProfile, VocabularyCacheConfig,
};
use campus_assistant::outbound::memory::{CatalogueSnapshot, InMemoryCatalogue, InMemoryUserProfiles};

/// Syllabus link of the `Internet` subject in the demo catalogue.
pub const INTERNET_SYLLABUS: &str = "https://www.etsit.upm.es/guias/internet.pdf";

/// Drive `future` to completion on a fresh runtime.
pub fn run_async<T>(future: impl Future<Output = T>) -> T {
    tokio::runtime::Runtime::new()
        .expect("runtime")
        .block_on(future)
}

/// Identity provider answering from a fixed credential table.
#[derive(Default)]
pub struct ScriptedIdentityProvider {
    accounts: Mutex<HashMap<String, String>>,
    lookups: AtomicUsize,
}

impl ScriptedIdentityProvider {
    /// Make `token` resolve to `user`.
    pub fn grant(&self, token: &str, user: &str) {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.to_owned(), user.to_owned());
    }

    /// Number of lookups performed so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentityProvider {
    async fn lookup(&self, credential: &Credential) -> Result<UserId, IdentityProviderError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let user = self
            .accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(credential.expose())
            .cloned();
        match user {
            Some(user) => {
                UserId::new(user).map_err(|err| IdentityProviderError::decode(err.to_string()))
            }
            None => Err(IdentityProviderError::rejected(401_u16)),
        }
    }
}

fn school(id: &str, email: &str) -> School {
    School {
        id: SchoolId::new(id),
        contacts: BTreeMap::from([
            ("correo".to_owned(), email.to_owned()),
            ("telefono".to_owned(), "910 672 000".to_owned()),
        ]),
    }
}

fn program(id: &str, name: &str, school: &str) -> Program {
    Program {
        id: ProgramId::new(id),
        name: name.to_owned(),
        school: SchoolId::new(school),
    }
}

fn subject(name: &str, program: &str, syllabus: Option<&str>, instructor: Option<&str>) -> Subject {
    Subject {
        name: name.to_owned(),
        program: ProgramId::new(program),
        syllabus_url: syllabus.map(str::to_owned),
        instructor_email: instructor.map(str::to_owned),
    }
}

/// Two schools, three programs, and a handful of subjects.
pub fn demo_catalogue() -> CatalogueSnapshot {
    CatalogueSnapshot {
        schools: vec![
            school("ETSIT", "secretaria.etsit@upm.es"),
            school("ETSII", "secretaria.etsii@upm.es"),
        ],
        programs: vec![
            program(
                "GITST",
                "Grado en Ingeniería de Tecnologías y Servicios de Telecomunicación",
                "ETSIT",
            ),
            program("GIB", "Grado en Ingeniería Biomédica", "ETSIT"),
            program("GITI", "Grado en Ingeniería en Tecnologías Industriales", "ETSII"),
        ],
        subjects: vec![
            subject("Internet", "GITST", Some(INTERNET_SYLLABUS), Some("m.garcia@upm.es")),
            subject("Redes de Ordenadores", "GITST", None, Some("m.garcia@upm.es")),
            subject("Señales y Sistemas", "GITST", None, None),
            subject("Programación", "GITST", None, None),
            subject("Biología Celular", "GIB", None, None),
        ],
        instructors: vec![Instructor {
            email: "m.garcia@upm.es".to_owned(),
            name: "María García".to_owned(),
        }],
        dates: vec![DateCatalogue {
            program: ProgramId::new("GITST"),
            categories: BTreeMap::from([
                (
                    "fechas de exámenes".to_owned(),
                    "del 8 al 26 de enero".to_owned(),
                ),
                ("festivos".to_owned(), "12 de octubre".to_owned()),
                (
                    "periodo de matrícula".to_owned(),
                    "del 15 al 31 de julio".to_owned(),
                ),
            ]),
        }],
    }
}

/// Dispatcher plus handles on the state scenarios inspect.
pub struct Assistant {
    pub dispatcher: TurnDispatcher,
    pub resolver: Arc<IdentityResolver<dyn IdentityProvider>>,
    pub provider: Arc<ScriptedIdentityProvider>,
    pub profiles: Arc<InMemoryUserProfiles>,
}

impl Assistant {
    /// Wire the standard intent registry.
    pub fn new(mode: IdentityMode) -> Self {
        Self::with_registry(mode, IntentRegistry::standard)
    }

    /// Wire a custom intent registry.
    pub fn with_registry(
        mode: IdentityMode,
        registry: impl FnOnce(&Arc<DynCatalogueService>, &ImageStore) -> IntentRegistry,
    ) -> Self {
        let repository: Arc<dyn CatalogueRepository> =
            Arc::new(InMemoryCatalogue::new(demo_catalogue()));
        let catalogue: Arc<DynCatalogueService> = Arc::new(CatalogueService::new(
            repository,
            VocabularyCacheConfig::default(),
        ));
        let provider = Arc::new(ScriptedIdentityProvider::default());
        let provider_port: Arc<dyn IdentityProvider> = provider.clone();
        let resolver = Arc::new(IdentityResolver::new(provider_port));
        let profiles = Arc::new(InMemoryUserProfiles::new());
        let profiles_port: Arc<dyn UserProfileRepository> = profiles.clone();
        let gate = Arc::new(AccessGate::new(
            mode,
            Arc::clone(&resolver),
            Arc::clone(&profiles_port),
        ));
        let registration =
            RegistrationFlow::new(Arc::clone(&catalogue), Arc::clone(&gate), profiles_port);
        let registry = registry(&catalogue, &ImageStore::default());

        Self {
            dispatcher: TurnDispatcher::new(registry, gate, registration),
            resolver,
            provider,
            profiles,
        }
    }

    /// Store a profile for `user`.
    pub async fn register(&self, user: &str, program: &str) {
        let profile = UserProfile::new(
            UserId::new(user).expect("user id"),
            ProgramId::new(program),
        );
        self.profiles.upsert(&profile).await.expect("profile stored");
    }

    /// Program `user` is registered to, if any.
    pub async fn program_of(&self, user: &str) -> Option<ProgramId> {
        let user_id = UserId::new(user).expect("user id");
        self.profiles
            .find_by_id(&user_id)
            .await
            .expect("profile lookup")
            .map(|profile| profile.program)
    }

    /// Answer one turn.
    pub async fn turn(&self, request: &TurnRequest) -> TurnResponse {
        self.dispatcher.dispatch(request).await
    }
}
