//! # waypoint-core
//!
//! Core types, traits, and error definitions for the Waypoint discovery client.
//!
//! This crate provides:
//! - Error types (`TransportError`, `CodecError`, `AttemptError`, `ResolveError`)
//! - The opaque `ServiceRecord` returned by a registry
//! - Protocol constants and `ClientConfig`
//! - The `Transport` trait (round-trip and fire-and-forget channels)

mod config;
mod error;
mod record;
mod transport;

pub use config::{ClientConfig, INVALIDATION_PORT, MAX_RETRIES, RESOLUTION_PORT, TIMEOUT};
pub use error::{AttemptError, CodecError, ResolveError, TransportError};
pub use record::ServiceRecord;
pub use transport::Transport;
