//! Diesel adapters against embedded PostgreSQL.
//!
//! Each test gets its own cluster and a freshly migrated database seeded with
//! rows inserted out of key order, so ordering assertions cannot pass by
//! accident of insertion order.

use campus_assistant::domain::ports::{CatalogueRepository, UserProfileRepository};
use campus_assistant::domain::{ProgramId, SchoolId, UserId, UserProfile, VocabularyQuery};
use campus_assistant::outbound::persistence::{
    DbPool, DieselCatalogueRepository, DieselUserProfileRepository, PoolConfig,
    run_pending_migrations,
};
use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use embedded_postgres::{
    count_profiles, execute_batch, handle_cluster_setup_failure, reset_database, test_cluster,
};

const TEST_DB: &str = "campus_assistant_repositories_test";

const SEED: &str = r#"
INSERT INTO secretarias (id, contactos) VALUES
    ('ETSIT', '{"correo": "secretaria.etsit@upm.es"}'),
    ('ETSIAAB', '{}'),
    ('ETSII', '{"telefono": "910 677 100"}');
INSERT INTO estudios (id, nombre, escuela) VALUES
    ('GITST', 'Grado en Ingeniería de Tecnologías y Servicios de Telecomunicación', 'ETSIT'),
    ('GIB', 'Grado en Ingeniería Biomédica', 'ETSIT'),
    ('GITI', 'Grado en Ingeniería en Tecnologías Industriales', 'ETSII');
INSERT INTO asignaturas (id_estudios, nombre) VALUES
    ('GITST', 'Señales y Sistemas'),
    ('GITST', 'Internet'),
    ('GIB', 'Biología Celular'),
    ('GITST', 'Redes de Ordenadores');
"#;

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    database_url: String,
    catalogue: DieselCatalogueRepository,
    profiles: DieselUserProfileRepository,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    let database_url = reset_database(&cluster, TEST_DB)?;
    runtime
        .block_on(run_pending_migrations(&database_url))
        .map_err(|err| err.to_string())?;
    execute_batch(&database_url, SEED)?;

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        database_url,
        catalogue: DieselCatalogueRepository::new(pool.clone()),
        profiles: DieselUserProfileRepository::new(pool),
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn repeated_registration_keeps_one_row_with_the_last_program(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: repeated_registration_keeps_one_row_with_the_last_program skipped");
        return;
    };
    let user_id = UserId::new("amzn1.account.ada").expect("valid id");

    for program in ["GITST", "GIB"] {
        let profile = UserProfile::new(user_id.clone(), ProgramId::new(program));
        context
            .runtime
            .block_on(context.profiles.upsert(&profile))
            .expect("upsert profile");
    }

    let stored = context
        .runtime
        .block_on(context.profiles.find_by_id(&user_id))
        .expect("fetch profile")
        .expect("profile stored");
    assert_eq!(stored.program, ProgramId::new("GIB"));
    assert_eq!(
        count_profiles(&context.database_url, user_id.as_ref()).expect("count rows"),
        1
    );
}

#[rstest]
fn unknown_users_have_no_profile(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_users_have_no_profile skipped");
        return;
    };
    let user_id = UserId::new("amzn1.account.nobody").expect("valid id");

    let stored = context
        .runtime
        .block_on(context.profiles.find_by_id(&user_id))
        .expect("fetch profile");

    assert!(stored.is_none());
}

#[rstest]
#[case::schools(VocabularyQuery::Schools, vec!["ETSIAAB", "ETSII", "ETSIT"])]
#[case::programs(
    VocabularyQuery::Programs { school: SchoolId::new("ETSIT") },
    vec![
        "Grado en Ingeniería Biomédica",
        "Grado en Ingeniería de Tecnologías y Servicios de Telecomunicación",
    ]
)]
#[case::subjects(
    VocabularyQuery::Subjects { program: ProgramId::new("GITST") },
    vec!["Internet", "Redes de Ordenadores", "Señales y Sistemas"]
)]
fn vocabularies_come_back_in_key_order(
    repo_context: Option<TestContext>,
    #[case] query: VocabularyQuery,
    #[case] expected: Vec<&str>,
) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: vocabularies_come_back_in_key_order skipped");
        return;
    };

    let values = context
        .runtime
        .block_on(context.catalogue.vocabulary(&query))
        .expect("vocabulary");

    assert_eq!(values, expected);
}

#[rstest]
fn school_contacts_decode_from_jsonb(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: school_contacts_decode_from_jsonb skipped");
        return;
    };

    let school = context
        .runtime
        .block_on(context.catalogue.find_school(&SchoolId::new("ETSIT")))
        .expect("fetch school")
        .expect("school stored");

    assert_eq!(
        school.contacts.get("correo").map(String::as_str),
        Some("secretaria.etsit@upm.es")
    );
}
