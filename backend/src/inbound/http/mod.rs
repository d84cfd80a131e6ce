//! HTTP inbound adapter exposing the turn endpoint and health probes.

pub mod error;
pub mod health;
pub mod state;
pub mod turns;

pub use error::ApiResult;
