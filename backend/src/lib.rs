//! University voice assistant backend.
//!
//! Answers conversational turns about syllabi, instructors, schedules,
//! exam dates, and school contacts for registered students, and walks
//! unregistered callers through a three-step registration.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
