//! Registry facade: `whereis` and `invalidate`.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared, WeakShared};
use waypoint_codec::encode_invalidate_request;
use waypoint_core::{ClientConfig, ResolveError, ServiceRecord, TIMEOUT, Transport};

use crate::cache::ServiceCache;
use crate::engine::ResolutionEngine;

type Resolution = BoxFuture<'static, Result<ServiceRecord, ResolveError>>;

/// A resolution shared by every caller that missed the cache for the same
/// service and host while it was running.
type Flight = Shared<Resolution>;

/// In-flight resolutions are tracked by weak handle only. Once every waiter
/// has gone the resolution is dropped together with its open channel.
type WeakFlight = WeakShared<Resolution>;

type FlightKey = (String, String);

/// Client for a service registry.
///
/// Lookups go through the cache first and only reach the registry on a
/// miss. Invalidation notifies the registry without waiting for any
/// acknowledgement and always clears the local entry.
///
/// ## Example
///
/// ```rust,ignore
/// use waypoint_discovery::RegistryClient;
/// use waypoint_transport::ZmqTransport;
///
/// let client = RegistryClient::new(ZmqTransport::new());
/// let record = client.whereis("orders-service", "registry1").await?;
/// client.invalidate("orders-service", "registry1").await;
/// ```
pub struct RegistryClient<T> {
    engine: Arc<ResolutionEngine<T>>,
    cache: Arc<ServiceCache>,
    in_flight: DashMap<FlightKey, WeakFlight>,
}

impl<T: Transport> RegistryClient<T> {
    /// Create a client with default configuration and its own cache.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Create a client with custom configuration and its own cache.
    #[must_use]
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self::with_cache(transport, config, Arc::new(ServiceCache::new()))
    }

    /// Create a client over an existing cache.
    ///
    /// Clients built over the same cache see each other's resolutions and
    /// invalidations.
    #[must_use]
    pub fn with_cache(transport: T, config: ClientConfig, cache: Arc<ServiceCache>) -> Self {
        Self {
            engine: Arc::new(ResolutionEngine::new(transport, config)),
            cache,
            in_flight: DashMap::new(),
        }
    }

    /// Get the cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<ServiceCache> {
        &self.cache
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        self.engine.config()
    }

    /// Get the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        self.engine.transport()
    }

    /// Find the record of `service`.
    ///
    /// A cached record is returned without touching the network, whatever
    /// `host` is. Otherwise the registry on `host` is queried and a
    /// successful answer is cached. A failure leaves the cache untouched.
    pub async fn whereis(&self, service: &str, host: &str) -> Result<ServiceRecord, ResolveError> {
        if let Some(record) = self.cache.get(service) {
            tracing::info!(service, "served from cache");
            return Ok(record);
        }

        tracing::info!(service, host, "resolving service");

        if self.engine.config().single_flight {
            self.join_flight(service, host).await
        } else {
            resolve_and_store(
                Arc::clone(&self.engine),
                Arc::clone(&self.cache),
                service.to_string(),
                host.to_string(),
            )
            .await
        }
    }

    /// Tell the registry on `host` to drop `service`, then drop it locally.
    ///
    /// Delivery is never confirmed and send failures are only logged; the
    /// local entry is removed regardless.
    pub async fn invalidate(&self, service: &str, host: &str) {
        tracing::info!(service, host, "invalidating service");

        let endpoint = self.engine.config().invalidation_endpoint(host);
        let request = encode_invalidate_request(service);

        match request.to_bytes() {
            Ok(payload) => {
                // A PUSH socket waits for a peer before sending, so an absent
                // registry would otherwise stall the call indefinitely.
                let push = self.engine.transport().push(&endpoint, payload);
                match tokio::time::timeout(TIMEOUT, push).await {
                    Ok(Ok(())) => {
                        tracing::debug!(request_id = %request.id, endpoint = %endpoint, "sent invalidate request");
                    }
                    Ok(Err(error)) => {
                        tracing::warn!(service, endpoint = %endpoint, error = %error, "failed to send invalidation");
                    }
                    Err(_) => {
                        tracing::warn!(service, endpoint = %endpoint, timeout = ?TIMEOUT, "invalidation send timed out");
                    }
                }
            }
            Err(error) => {
                tracing::warn!(service, error = %error, "failed to encode invalidation");
            }
        }

        self.cache.remove(service);
        // Later misses must start a fresh resolution rather than join one
        // that began before this invalidation.
        self.in_flight.retain(|(name, _), _| name != service);
    }

    async fn join_flight(&self, service: &str, host: &str) -> Result<ServiceRecord, ResolveError> {
        let key = (service.to_string(), host.to_string());

        let flight = match self.in_flight.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                match entry.get().upgrade().filter(|flight| flight.peek().is_none()) {
                    Some(flight) => flight,
                    None => {
                        let flight = self.start_flight(service, host);
                        if let Some(weak) = flight.downgrade() {
                            entry.insert(weak);
                        }
                        flight
                    }
                }
            }
            Entry::Vacant(entry) => {
                let flight = self.start_flight(service, host);
                if let Some(weak) = flight.downgrade() {
                    entry.insert(weak);
                }
                flight
            }
        };

        let mut guard = FlightGuard {
            in_flight: &self.in_flight,
            key,
            flight: None,
        };
        let result = guard.flight.insert(flight).await;
        drop(guard);
        result
    }

    fn start_flight(&self, service: &str, host: &str) -> Flight {
        resolve_and_store(
            Arc::clone(&self.engine),
            Arc::clone(&self.cache),
            service.to_string(),
            host.to_string(),
        )
        .boxed()
        .shared()
    }
}

/// A waiter's hold on a flight.
///
/// Dropped on every exit path, including the waiter itself being dropped
/// mid-await. The flight is forgotten once it has settled or nobody is left
/// waiting on it.
struct FlightGuard<'a> {
    in_flight: &'a DashMap<FlightKey, WeakFlight>,
    key: FlightKey,
    flight: Option<Flight>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        // If this was the last handle, the resolution and its channel go with it.
        drop(self.flight.take());

        self.in_flight.remove_if(&self.key, |_, weak| {
            weak.upgrade().is_none_or(|flight| flight.peek().is_some())
        });
    }
}

async fn resolve_and_store<T: Transport>(
    engine: Arc<ResolutionEngine<T>>,
    cache: Arc<ServiceCache>,
    service: String,
    host: String,
) -> Result<ServiceRecord, ResolveError> {
    let record = engine.resolve(&service, &host).await?;
    tracing::info!(service = %service, record = %record, "found service");
    cache.put(service, record.clone());
    Ok(record)
}
