//! Protocol constants and client configuration.

use std::time::Duration;

/// Deadline for a single resolution attempt.
pub const TIMEOUT: Duration = Duration::from_millis(3000);

/// Total number of resolution attempts before giving up.
pub const MAX_RETRIES: u32 = 3;

/// Well-known port of the registry's request/reply endpoint.
pub const RESOLUTION_PORT: u16 = 3002;

/// Well-known port of the registry's fire-and-forget invalidation endpoint.
pub const INVALIDATION_PORT: u16 = 3001;

/// Configuration for the registry client.
///
/// The per-attempt deadline and the attempt bound are protocol constants
/// ([`TIMEOUT`], [`MAX_RETRIES`]) and are deliberately absent here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// URL scheme used to build endpoints.
    pub scheme: String,

    /// Port of the resolution endpoint.
    pub resolution_port: u16,

    /// Port of the invalidation endpoint.
    pub invalidation_port: u16,

    /// Share one in-flight resolution between concurrent misses on a name.
    pub single_flight: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: "tcp".to_string(),
            resolution_port: RESOLUTION_PORT,
            invalidation_port: INVALIDATION_PORT,
            single_flight: true,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL scheme.
    #[must_use]
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set the resolution port.
    #[must_use]
    pub fn resolution_port(mut self, port: u16) -> Self {
        self.resolution_port = port;
        self
    }

    /// Set the invalidation port.
    #[must_use]
    pub fn invalidation_port(mut self, port: u16) -> Self {
        self.invalidation_port = port;
        self
    }

    /// Enable or disable single-flight resolution.
    #[must_use]
    pub fn single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }

    /// Endpoint answering `find` requests on `host`.
    #[must_use]
    pub fn resolution_endpoint(&self, host: &str) -> String {
        format!("{}://{}:{}", self.scheme, host, self.resolution_port)
    }

    /// Endpoint accepting `invalidate` notifications on `host`.
    #[must_use]
    pub fn invalidation_endpoint(&self, host: &str) -> String {
        format!("{}://{}:{}", self.scheme, host, self.invalidation_port)
    }
}
