//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! The voice platform reaches the assistant over HTTP; see [`http`].

pub mod http;
