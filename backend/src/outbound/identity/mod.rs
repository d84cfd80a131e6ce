//! Identity provider outbound adapters.
//!
//! A thin HTTP implementation of the `IdentityProvider` port.

mod http_provider;

pub use http_provider::{DEFAULT_IDENTITY_ENDPOINT, HttpIdentityProvider};
