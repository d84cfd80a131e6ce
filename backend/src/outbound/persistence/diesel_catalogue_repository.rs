//! PostgreSQL-backed `CatalogueRepository` implementation using Diesel ORM.
//!
//! The catalogue is read-only from the assistant's side. Vocabulary listings
//! are ordered by primary key so the matcher's first-wins tie-break is
//! stable across calls.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{
    DateCatalogue, Instructor, Program, ProgramId, School, SchoolId, Subject, VocabularyQuery,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DatesRow, InstructorRow, ProgramRow, SchoolRow, SubjectRow};
use super::pool::{DbPool, PoolError};
use super::schema::{asignaturas, estudios, fechas, profesores, secretarias};

/// Diesel-backed implementation of the [`CatalogueRepository`] port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CatalogueRepositoryError {
    map_pool_error(error, CatalogueRepositoryError::connection)
}

fn diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> CatalogueRepositoryError {
    move |error| {
        map_diesel_error(
            &error,
            operation,
            CatalogueRepositoryError::query,
            CatalogueRepositoryError::connection,
        )
    }
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn vocabulary(
        &self,
        query: &VocabularyQuery,
    ) -> Result<Vec<String>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        match query {
            VocabularyQuery::Schools => secretarias::table
                .select(secretarias::id)
                .order(secretarias::id)
                .load(&mut conn)
                .await
                .map_err(diesel_error("list schools")),
            VocabularyQuery::Programs { school } => estudios::table
                .filter(estudios::escuela.eq(school.as_ref()))
                .select(estudios::nombre)
                .order(estudios::id)
                .load(&mut conn)
                .await
                .map_err(diesel_error("list programs of school")),
            VocabularyQuery::Subjects { program } => asignaturas::table
                .filter(asignaturas::id_estudios.eq(program.as_ref()))
                .select(asignaturas::nombre)
                .order(asignaturas::nombre)
                .load(&mut conn)
                .await
                .map_err(diesel_error("list subjects")),
        }
    }

    async fn find_program(
        &self,
        id: &ProgramId,
    ) -> Result<Option<Program>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        estudios::table
            .find(id.as_ref())
            .select(ProgramRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Program::from))
            .map_err(diesel_error("find program"))
    }

    async fn find_program_by_name(
        &self,
        school: &SchoolId,
        name: &str,
    ) -> Result<Option<Program>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        estudios::table
            .filter(estudios::escuela.eq(school.as_ref()))
            .filter(estudios::nombre.eq(name))
            .order(estudios::id)
            .select(ProgramRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Program::from))
            .map_err(diesel_error("find program by name"))
    }

    async fn find_school(&self, id: &SchoolId) -> Result<Option<School>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        secretarias::table
            .find(id.as_ref())
            .select(SchoolRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(School::from))
            .map_err(diesel_error("find school"))
    }

    async fn find_subject(
        &self,
        program: &ProgramId,
        name: &str,
    ) -> Result<Option<Subject>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        asignaturas::table
            .find((program.as_ref(), name))
            .select(SubjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Subject::from))
            .map_err(diesel_error("find subject"))
    }

    async fn find_instructor(
        &self,
        email: &str,
    ) -> Result<Option<Instructor>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        profesores::table
            .find(email)
            .select(InstructorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Instructor::from))
            .map_err(diesel_error("find instructor"))
    }

    async fn find_dates(
        &self,
        program: &ProgramId,
    ) -> Result<Option<DateCatalogue>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        fechas::table
            .find(program.as_ref())
            .select(DatesRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(DateCatalogue::from))
            .map_err(diesel_error("find dates"))
    }
}
