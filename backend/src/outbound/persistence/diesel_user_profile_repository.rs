//! PostgreSQL-backed `UserProfileRepository` implementation using Diesel ORM.
//!
//! Registration writes are a single `INSERT ... ON CONFLICT (id) DO UPDATE`
//! so a user double-submitting the final registration step cannot lose an
//! update.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserProfileRepository, UserProfileRepositoryError};
use crate::domain::{UserId, UserProfile};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserProfileRow, UserProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::usuarios;

/// Diesel-backed implementation of the [`UserProfileRepository`] port.
#[derive(Clone)]
pub struct DieselUserProfileRepository {
    pool: DbPool,
}

impl DieselUserProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserProfileRepositoryError {
    map_pool_error(error, UserProfileRepositoryError::connection)
}

fn diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> UserProfileRepositoryError {
    move |error| {
        map_diesel_error(
            &error,
            operation,
            UserProfileRepositoryError::query,
            UserProfileRepositoryError::connection,
        )
    }
}

#[async_trait]
impl UserProfileRepository for DieselUserProfileRepository {
    async fn find_by_id(
        &self,
        id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = usuarios::table
            .find(id.as_ref())
            .select(UserProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("load profile"))?;

        row.map(UserProfile::try_from)
            .transpose()
            .map_err(|err| {
                warn!(user_id = %id, error = %err, "stored profile failed validation");
                UserProfileRepositoryError::query(format!("stored profile invalid: {err}"))
            })
    }

    async fn upsert(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserProfileRow {
            id: profile.user_id.as_ref(),
            estudios: profile.program.as_ref(),
        };

        diesel::insert_into(usuarios::table)
            .values(&row)
            .on_conflict(usuarios::id)
            .do_update()
            .set(usuarios::estudios.eq(excluded(usuarios::estudios)))
            .execute(&mut conn)
            .await
            .map_err(diesel_error("upsert profile"))?;
        Ok(())
    }
}
