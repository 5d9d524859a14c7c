//! # waypoint-discovery
//!
//! Service resolution against a Waypoint registry.
//!
//! This crate provides:
//! - `ServiceCache` - concurrent name-to-record cache with no expiry
//! - `ResolutionEngine` - bounded-retry request/reply with a per-attempt deadline
//! - `RegistryClient` - the `whereis` / `invalidate` facade tying both together

mod cache;
mod engine;
mod registry;

pub use cache::ServiceCache;
pub use engine::ResolutionEngine;
pub use registry::RegistryClient;
