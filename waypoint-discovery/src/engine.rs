//! Bounded-retry resolution of a single service name.

use waypoint_codec::{decode_response, encode_find_request};
use waypoint_core::{
    AttemptError, ClientConfig, MAX_RETRIES, ResolveError, ServiceRecord, TIMEOUT, Transport,
};

/// Resolves service names against a registry host.
///
/// Each attempt opens a fresh round-trip channel, sends a `find` request
/// with a fresh id, and races the reply against [`TIMEOUT`]. A timeout, a
/// transport failure, and an undecodable reply are all treated the same:
/// the attempt is abandoned and the next one starts immediately, up to
/// [`MAX_RETRIES`] attempts in total.
///
/// ```text
/// Idle -> Sent(1) -> Resolved
///                 -> Retrying(2) -> Sent(2) -> ... -> Sent(MAX_RETRIES) -> Failed
/// ```
pub struct ResolutionEngine<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> ResolutionEngine<T> {
    /// Create an engine over the given transport.
    #[must_use]
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Get the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve `service` against `host`.
    ///
    /// Only the terminal [`ResolveError::ExhaustedRetries`] is surfaced;
    /// per-attempt failures are logged and retried.
    pub async fn resolve(&self, service: &str, host: &str) -> Result<ServiceRecord, ResolveError> {
        for attempt in 1..=MAX_RETRIES {
            match self.attempt(service, host, attempt).await {
                Ok(record) => return Ok(record),
                Err(error) => {
                    tracing::warn!(service, host, attempt, error = %error, "resolution attempt failed");
                    if attempt < MAX_RETRIES {
                        tracing::info!(service, host, next_attempt = attempt + 1, "retrying");
                    }
                }
            }
        }

        let error = ResolveError::exhausted(host, MAX_RETRIES);
        tracing::error!(service, host, attempts = MAX_RETRIES, "{error}");
        Err(error)
    }

    /// Run one attempt: fresh channel, fresh request id, one reply or timeout.
    ///
    /// The round-trip future owns the channel, so whichever of reply and
    /// timeout loses the race, the channel is dropped before this returns.
    pub async fn attempt(
        &self,
        service: &str,
        host: &str,
        attempt: u32,
    ) -> Result<ServiceRecord, AttemptError> {
        let endpoint = self.config.resolution_endpoint(host);
        tracing::info!(service, endpoint = %endpoint, attempt, "attempting to retrieve service information");

        let request = encode_find_request(service);
        let payload = request.to_bytes()?;
        tracing::debug!(request_id = %request.id, endpoint = %endpoint, "sending find request");

        let reply = tokio::time::timeout(TIMEOUT, self.transport.call(&endpoint, payload))
            .await
            .map_err(|_| AttemptError::Timeout(TIMEOUT))??;

        let response = decode_response(&reply)?;
        tracing::debug!(request_id = %request.id, reply_id = %response.id, "received reply");

        Ok(response.result)
    }
}
