//! # Waypoint
//!
//! Client-side service discovery against a registry host.
//!
//! Waypoint provides:
//! - **Cached lookups**: `whereis` answers from an in-memory cache and only
//!   asks the registry on a miss
//! - **Bounded retries**: every lookup makes at most [`MAX_RETRIES`] attempts,
//!   each with a fresh channel, a fresh request id, and a [`TIMEOUT`] deadline
//! - **Invalidation**: `invalidate` notifies the registry fire-and-forget and
//!   always clears the local entry
//! - **Single-flight**: concurrent misses on one name share a single lookup
//!
//! ## Quick Start
//!
//! ```rust
//! use waypoint::{ClientConfig, RegistryClient, ScriptedTransport, ServiceCache};
//! use std::sync::Arc;
//!
//! // A cache can be shared by several clients
//! let cache = Arc::new(ServiceCache::new());
//!
//! // Scripted transport for illustration; use `ZmqTransport` against a real registry
//! let client = RegistryClient::with_cache(
//!     ScriptedTransport::new(),
//!     ClientConfig::default(),
//!     Arc::clone(&cache),
//! );
//!
//! assert_eq!(
//!     client.config().resolution_endpoint("registry1"),
//!     "tcp://registry1:3002"
//! );
//! assert!(cache.is_empty());
//! ```
//!
//! ## Architecture
//!
//! Waypoint is composed of several crates:
//!
//! - [`waypoint-core`] - Errors, records, constants, and the `Transport` trait
//! - [`waypoint-codec`] - JSON-RPC request/response envelopes
//! - [`waypoint-transport`] - ZeroMQ and scripted transports
//! - [`waypoint-discovery`] - Cache, resolution engine, and registry client

// Re-export core types
pub use waypoint_core::{
    AttemptError, ClientConfig, CodecError, INVALIDATION_PORT, MAX_RETRIES, RESOLUTION_PORT,
    ResolveError, ServiceRecord, TIMEOUT, Transport, TransportError,
};

// Re-export codec
pub use waypoint_codec::{
    Method, Params, RequestEnvelope, ResponseEnvelope, decode_response, encode_find_request,
    encode_invalidate_request,
};

// Re-export transports
pub use waypoint_transport::{CallRecord, Outcome, ScriptedTransport, ZmqTransport};

// Re-export discovery
pub use waypoint_discovery::{RegistryClient, ResolutionEngine, ServiceCache};

/// Prelude module for convenient imports.
///
/// ```rust
/// use waypoint::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ClientConfig, RegistryClient, ResolveError, ServiceCache, ServiceRecord, Transport,
        ZmqTransport,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
