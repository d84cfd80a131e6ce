//! In-process adapters.
//!
//! Used when no database is configured, and by behavioural tests.

mod catalogue;
mod profiles;

pub use catalogue::{CatalogueFixtureError, CatalogueSnapshot, InMemoryCatalogue};
pub use profiles::InMemoryUserProfiles;
