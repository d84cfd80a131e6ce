//! Catalogue reads for the turn handlers.
//!
//! [`CatalogueService`] resolves spoken terms against catalogue vocabularies
//! and performs the keyed lookups that follow, mapping repository failures
//! into domain errors. Vocabularies are cached in a bounded, time-limited
//! cache keyed by [`VocabularyQuery`]; the cache lives as long as the service,
//! which the server builds once at start-up.

use std::sync::Arc;
use std::time::Duration;

use mini_moka::sync::Cache;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::term_matcher::best_match;
use crate::domain::{
    DateCatalogue, Error, Instructor, Program, ProgramId, School, SchoolId, Subject,
    VocabularyQuery,
};

/// Bounds of the vocabulary cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyCacheConfig {
    /// Maximum number of cached vocabularies.
    pub capacity: u64,
    /// Time a cached vocabulary stays valid.
    pub ttl: Duration,
}

impl Default for VocabularyCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            ttl: Duration::from_secs(300),
        }
    }
}

/// Catalogue service over a type-erased repository, as wired by the server.
pub type DynCatalogueService = CatalogueService<dyn CatalogueRepository>;

/// Catalogue facade shared by registration and the query handlers.
pub struct CatalogueService<C: ?Sized> {
    repository: Arc<C>,
    vocabularies: Cache<VocabularyQuery, Arc<Vec<String>>>,
}

impl<C: ?Sized> CatalogueService<C> {
    /// Create a service over `repository`.
    pub fn new(repository: Arc<C>, config: VocabularyCacheConfig) -> Self {
        let vocabularies = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(config.ttl)
            .build();
        Self {
            repository,
            vocabularies,
        }
    }
}

impl<C> CatalogueService<C>
where
    C: CatalogueRepository + ?Sized,
{
    fn map_repository_error(error: CatalogueRepositoryError) -> Error {
        match error {
            CatalogueRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("catalogue unavailable: {message}"))
            }
            CatalogueRepositoryError::Query { message } => {
                Error::internal(format!("catalogue error: {message}"))
            }
        }
    }

    /// Fetch a vocabulary, serving repeated queries from the cache.
    pub async fn vocabulary(&self, query: &VocabularyQuery) -> Result<Arc<Vec<String>>, Error> {
        if let Some(cached) = self.vocabularies.get(query) {
            debug!(%query, "vocabulary cache hit");
            return Ok(cached);
        }
        let values = self
            .repository
            .vocabulary(query)
            .await
            .map_err(Self::map_repository_error)?;
        let values = Arc::new(values);
        self.vocabularies.insert(query.clone(), Arc::clone(&values));
        Ok(values)
    }

    /// Resolve free text to the closest vocabulary entry.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NoMatch`] when the vocabulary is empty,
    /// plus any repository failure.
    pub async fn resolve(&self, input: &str, query: &VocabularyQuery) -> Result<String, Error> {
        let vocabulary = self.vocabulary(query).await?;
        let matched = best_match(input, vocabulary.iter())
            .map_err(|err| err.with_details(json!({ "vocabulary": query.to_string() })))?;
        debug!(%query, input, matched = matched.as_str(), "resolved term");
        Ok(matched.clone())
    }

    /// Program by identifier.
    pub async fn program(&self, id: &ProgramId) -> Result<Program, Error> {
        self.repository
            .find_program(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| missing("program", json!({ "program": id })))
    }

    /// Program by exact name within a school.
    pub async fn program_named(&self, school: &SchoolId, name: &str) -> Result<Program, Error> {
        self.repository
            .find_program_by_name(school, name)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| missing("program", json!({ "school": school, "name": name })))
    }

    /// School by identifier.
    pub async fn school(&self, id: &SchoolId) -> Result<School, Error> {
        self.repository
            .find_school(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| missing("school", json!({ "school": id })))
    }

    /// Subject by exact name within a program.
    pub async fn subject(&self, program: &ProgramId, name: &str) -> Result<Subject, Error> {
        self.repository
            .find_subject(program, name)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| missing("subject", json!({ "program": program, "subject": name })))
    }

    /// Instructor by contact address.
    pub async fn instructor(&self, email: &str) -> Result<Instructor, Error> {
        self.repository
            .find_instructor(email)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| missing("instructor", json!({ "email": email })))
    }

    /// Calendar of a program.
    pub async fn dates(&self, program: &ProgramId) -> Result<DateCatalogue, Error> {
        self.repository
            .find_dates(program)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| missing("dates", json!({ "program": program })))
    }
}

fn missing(entity: &str, details: serde_json::Value) -> Error {
    Error::catalogue_miss(format!("{entity} not found in catalogue")).with_details(details)
}
