//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the domain expects to reach driven adapters (the
//! catalogue store, the profile store, the identity provider). Each trait
//! exposes a typed error so adapters map failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_repository;
mod identity_provider;
mod turn_service;
mod user_profile_repository;

#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{
    CatalogueRepository, CatalogueRepositoryError, FixtureCatalogueRepository,
};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{FixtureIdentityProvider, IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use turn_service::MockTurnService;
pub use turn_service::{FixtureTurnService, TurnService};
#[cfg(test)]
pub use user_profile_repository::MockUserProfileRepository;
pub use user_profile_repository::{
    FixtureUserProfileRepository, UserProfileRepository, UserProfileRepositoryError,
};
