//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed catalogue and profile repositories
//!   using Diesel ORM
//! - **memory**: in-process catalogue and profile store for local runs and
//!   tests
//! - **identity**: HTTP client for the platform's identity provider
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod identity;
pub mod memory;
pub mod persistence;
