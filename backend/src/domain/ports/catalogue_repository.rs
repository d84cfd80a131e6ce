//! Read-side port for the academic catalogue.
//!
//! Catalogue collections are maintained outside the assistant. Adapters
//! expose vocabulary listings for fuzzy matching plus keyed lookups for the
//! entity a matched term refers to.

use async_trait::async_trait;

use crate::domain::{
    DateCatalogue, Instructor, Program, ProgramId, School, SchoolId, Subject, VocabularyQuery,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading the catalogue.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "catalogue connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "catalogue query failed: {message}",
    }
}

/// Port for catalogue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// List the values of one field across a collection.
    ///
    /// Values come back in a stable order (primary key order for database
    /// adapters) so that tie-breaking in the matcher is reproducible.
    async fn vocabulary(
        &self,
        query: &VocabularyQuery,
    ) -> Result<Vec<String>, CatalogueRepositoryError>;

    /// Fetch a program by identifier.
    async fn find_program(
        &self,
        id: &ProgramId,
    ) -> Result<Option<Program>, CatalogueRepositoryError>;

    /// Fetch a program by its exact display name within a school.
    async fn find_program_by_name(
        &self,
        school: &SchoolId,
        name: &str,
    ) -> Result<Option<Program>, CatalogueRepositoryError>;

    /// Fetch a school by identifier.
    async fn find_school(&self, id: &SchoolId) -> Result<Option<School>, CatalogueRepositoryError>;

    /// Fetch a subject by exact name within a program.
    async fn find_subject(
        &self,
        program: &ProgramId,
        name: &str,
    ) -> Result<Option<Subject>, CatalogueRepositoryError>;

    /// Fetch an instructor by contact address.
    async fn find_instructor(
        &self,
        email: &str,
    ) -> Result<Option<Instructor>, CatalogueRepositoryError>;

    /// Fetch the calendar of a program.
    async fn find_dates(
        &self,
        program: &ProgramId,
    ) -> Result<Option<DateCatalogue>, CatalogueRepositoryError>;
}

/// Fixture implementation backed by an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueRepository;

#[async_trait]
impl CatalogueRepository for FixtureCatalogueRepository {
    async fn vocabulary(
        &self,
        _query: &VocabularyQuery,
    ) -> Result<Vec<String>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_program(
        &self,
        _id: &ProgramId,
    ) -> Result<Option<Program>, CatalogueRepositoryError> {
        Ok(None)
    }

    async fn find_program_by_name(
        &self,
        _school: &SchoolId,
        _name: &str,
    ) -> Result<Option<Program>, CatalogueRepositoryError> {
        Ok(None)
    }

    async fn find_school(
        &self,
        _id: &SchoolId,
    ) -> Result<Option<School>, CatalogueRepositoryError> {
        Ok(None)
    }

    async fn find_subject(
        &self,
        _program: &ProgramId,
        _name: &str,
    ) -> Result<Option<Subject>, CatalogueRepositoryError> {
        Ok(None)
    }

    async fn find_instructor(
        &self,
        _email: &str,
    ) -> Result<Option<Instructor>, CatalogueRepositoryError> {
        Ok(None)
    }

    async fn find_dates(
        &self,
        _program: &ProgramId,
    ) -> Result<Option<DateCatalogue>, CatalogueRepositoryError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_lists_empty_vocabularies() {
        let repo = FixtureCatalogueRepository;
        let schools = repo
            .vocabulary(&VocabularyQuery::Schools)
            .await
            .expect("fixture vocabulary should succeed");
        assert!(schools.is_empty());
    }

    #[tokio::test]
    async fn fixture_finds_nothing() {
        let repo = FixtureCatalogueRepository;
        let program = ProgramId::new("GIT");
        assert!(repo.find_program(&program).await.expect("lookup").is_none());
        assert!(repo.find_dates(&program).await.expect("lookup").is_none());
        assert!(repo.find_instructor("a@b.es").await.expect("lookup").is_none());
    }

    #[test]
    fn errors_render_their_message() {
        let err = CatalogueRepositoryError::query("relation missing");
        assert_eq!(err.to_string(), "catalogue query failed: relation missing");
    }
}
