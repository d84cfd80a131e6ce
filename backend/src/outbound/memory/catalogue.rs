//! In-process catalogue loaded from a JSON snapshot.
//!
//! Entries keep the order they have in the snapshot, which becomes the
//! enumeration order the matcher breaks ties on.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{
    DateCatalogue, Instructor, Program, ProgramId, School, SchoolId, Subject, VocabularyQuery,
};

/// Errors raised while loading a snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueFixtureError {
    /// The file could not be read.
    #[error("failed to read catalogue fixture {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid snapshot.
    #[error("failed to parse catalogue fixture {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Serialised form of the whole catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueSnapshot {
    /// Schools and their contact channels.
    pub schools: Vec<School>,
    /// Programs of study.
    pub programs: Vec<Program>,
    /// Subjects per program.
    pub subjects: Vec<Subject>,
    /// Instructors.
    pub instructors: Vec<Instructor>,
    /// Calendars per program.
    pub dates: Vec<DateCatalogue>,
}

/// [`CatalogueRepository`] over an immutable [`CatalogueSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogue {
    snapshot: CatalogueSnapshot,
}

impl InMemoryCatalogue {
    /// Serve `snapshot`.
    pub fn new(snapshot: CatalogueSnapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// [`CatalogueFixtureError`] when the file is unreadable or malformed.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogueFixtureError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogueFixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: CatalogueSnapshot =
            serde_json::from_str(&raw).map_err(|source| CatalogueFixtureError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            path = %path.display(),
            schools = snapshot.schools.len(),
            programs = snapshot.programs.len(),
            subjects = snapshot.subjects.len(),
            "catalogue fixture loaded"
        );
        Ok(Self::new(snapshot))
    }
}

#[async_trait]
impl CatalogueRepository for InMemoryCatalogue {
    async fn vocabulary(
        &self,
        query: &VocabularyQuery,
    ) -> Result<Vec<String>, CatalogueRepositoryError> {
        let snapshot = &self.snapshot;
        let values = match query {
            VocabularyQuery::Schools => snapshot
                .schools
                .iter()
                .map(|school| school.id.to_string())
                .collect(),
            VocabularyQuery::Programs { school } => snapshot
                .programs
                .iter()
                .filter(|program| program.school == *school)
                .map(|program| program.name.clone())
                .collect(),
            VocabularyQuery::Subjects { program } => snapshot
                .subjects
                .iter()
                .filter(|subject| subject.program == *program)
                .map(|subject| subject.name.clone())
                .collect(),
        };
        Ok(values)
    }

    async fn find_program(
        &self,
        id: &ProgramId,
    ) -> Result<Option<Program>, CatalogueRepositoryError> {
        Ok(self
            .snapshot
            .programs
            .iter()
            .find(|program| program.id == *id)
            .cloned())
    }

    async fn find_program_by_name(
        &self,
        school: &SchoolId,
        name: &str,
    ) -> Result<Option<Program>, CatalogueRepositoryError> {
        Ok(self
            .snapshot
            .programs
            .iter()
            .find(|program| program.school == *school && program.name == name)
            .cloned())
    }

    async fn find_school(&self, id: &SchoolId) -> Result<Option<School>, CatalogueRepositoryError> {
        Ok(self
            .snapshot
            .schools
            .iter()
            .find(|school| school.id == *id)
            .cloned())
    }

    async fn find_subject(
        &self,
        program: &ProgramId,
        name: &str,
    ) -> Result<Option<Subject>, CatalogueRepositoryError> {
        Ok(self
            .snapshot
            .subjects
            .iter()
            .find(|subject| subject.program == *program && subject.name == name)
            .cloned())
    }

    async fn find_instructor(
        &self,
        email: &str,
    ) -> Result<Option<Instructor>, CatalogueRepositoryError> {
        Ok(self
            .snapshot
            .instructors
            .iter()
            .find(|instructor| instructor.email == email)
            .cloned())
    }

    async fn find_dates(
        &self,
        program: &ProgramId,
    ) -> Result<Option<DateCatalogue>, CatalogueRepositoryError> {
        Ok(self
            .snapshot
            .dates
            .iter()
            .find(|dates| dates.program == *program)
            .cloned())
    }
}
