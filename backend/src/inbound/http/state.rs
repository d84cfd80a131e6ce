//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! the driving port, so they are testable with a mock service.

use std::sync::Arc;

use crate::domain::ports::{FixtureTurnService, TurnService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Answers conversational turns.
    pub turns: Arc<dyn TurnService>,
}

impl HttpState {
    /// Bundle `turns`.
    pub fn new(turns: Arc<dyn TurnService>) -> Self {
        Self { turns }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(Arc::new(FixtureTurnService))
    }
}
