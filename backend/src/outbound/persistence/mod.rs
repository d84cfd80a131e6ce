//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the catalogue and profile ports backed by
//! PostgreSQL via `diesel-async` and a `bb8` pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: pool and Diesel failures map onto the ports' error
//!   enums.
//!
//! # Example
//!
//! ```ignore
//! use campus_assistant::outbound::persistence::{
//!     DbPool, DieselUserProfileRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! run_pending_migrations("postgres://localhost/campus").await?;
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/campus")).await?;
//! let profiles = DieselUserProfileRepository::new(pool);
//! ```

mod diesel_catalogue_repository;
mod diesel_user_profile_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_user_profile_repository::DieselUserProfileRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
