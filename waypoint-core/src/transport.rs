//! Transport trait definitions.
//!
//! The `Transport` trait abstracts over the two channel shapes the client
//! needs from a message library: a one-shot request/reply exchange and a
//! fire-and-forget push.

use std::future::Future;

use crate::error::TransportError;

/// Message transport used to talk to a registry.
///
/// Implementations must open a fresh channel for every `call` and every
/// `push`. A channel is never reused, so a reply read from it always belongs
/// to the request just written to it.
///
/// # Example
///
/// ```rust
/// use waypoint_core::{Transport, TransportError};
///
/// struct Loopback;
///
/// impl Transport for Loopback {
///     async fn call(&self, _endpoint: &str, request: Vec<u8>) -> Result<Vec<u8>, TransportError> {
///         Ok(request)
///     }
///
///     async fn push(&self, _endpoint: &str, _message: Vec<u8>) -> Result<(), TransportError> {
///         Ok(())
///     }
/// }
/// ```
pub trait Transport: Send + Sync + 'static {
    /// Open a round-trip channel to `endpoint`, send `request`, and wait for
    /// exactly one reply.
    ///
    /// The channel lives inside the returned future. Dropping the future
    /// before it completes (e.g. on timeout) closes the channel.
    fn call(
        &self,
        endpoint: &str,
        request: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;

    /// Open a fire-and-forget channel to `endpoint` and send `message`.
    ///
    /// Success only means the message was handed to the transport; delivery
    /// is never confirmed.
    fn push(
        &self,
        endpoint: &str,
        message: Vec<u8>,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn call(
        &self,
        endpoint: &str,
        request: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send {
        (**self).call(endpoint, request)
    }

    fn push(
        &self,
        endpoint: &str,
        message: Vec<u8>,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).push(endpoint, message)
    }
}
