//! ZeroMQ transport implementation.

use futures::SinkExt;
use tmq::Multipart;
use tracing::{debug, trace};

use waypoint_core::{Transport, TransportError};

/// Default linger for PUSH sockets, in milliseconds.
///
/// Bounds how long an undelivered notification may hold up context
/// shutdown once its socket has been dropped.
pub const DEFAULT_PUSH_LINGER_MS: i32 = 1_000;

/// ZeroMQ transport built on tmq.
///
/// Every `call` connects a fresh REQ socket, sends one request and reads
/// one reply; every `push` connects a fresh PUSH socket and sends one
/// message. Sockets are dropped (closed) when the operation's future
/// completes or is dropped.
///
/// REQ sockets linger for zero milliseconds so an abandoned request to an
/// unreachable registry never blocks context shutdown.
///
/// ## Example
///
/// ```rust
/// use waypoint_transport::ZmqTransport;
///
/// let transport = ZmqTransport::new();
///
/// // Round trips are async:
/// // let reply = transport.call("tcp://registry1:3002", request).await?;
/// ```
#[derive(Clone)]
pub struct ZmqTransport {
    context: tmq::Context,
    push_linger_ms: i32,
}

impl ZmqTransport {
    /// Create a transport with its own ZeroMQ context.
    #[must_use]
    pub fn new() -> Self {
        Self::with_context(tmq::Context::new())
    }

    /// Create a transport sharing an existing ZeroMQ context.
    ///
    /// Required for `inproc://` endpoints, which only connect sockets of the
    /// same context.
    #[must_use]
    pub fn with_context(context: tmq::Context) -> Self {
        Self {
            context,
            push_linger_ms: DEFAULT_PUSH_LINGER_MS,
        }
    }

    /// Set the linger of PUSH sockets (`-1` waits forever).
    #[must_use]
    pub fn push_linger_ms(mut self, linger_ms: i32) -> Self {
        self.push_linger_ms = linger_ms;
        self
    }

    /// Get the underlying ZeroMQ context.
    #[must_use]
    pub fn context(&self) -> &tmq::Context {
        &self.context
    }
}

impl Default for ZmqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ZmqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZmqTransport")
            .field("push_linger_ms", &self.push_linger_ms)
            .finish_non_exhaustive()
    }
}

impl Transport for ZmqTransport {
    async fn call(&self, endpoint: &str, request: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let socket = tmq::request(&self.context)
            .set_linger(0)
            .connect(endpoint)
            .map_err(|e| TransportError::ConnectionFailed(format!("{endpoint}: {e}")))?;
        debug!(endpoint, "REQ socket connected");

        trace!(endpoint, bytes = request.len(), "sending request");
        let receiver = socket
            .send(Multipart::from(vec![request]))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;

        // The REQ socket comes back with the reply and is dropped here.
        let (reply, _socket) = receiver
            .recv()
            .await
            .map_err(|e| TransportError::Receive(e.to_string()))?;

        let bytes: Vec<u8> = reply.into_iter().flat_map(|frame| frame.to_vec()).collect();
        trace!(endpoint, bytes = bytes.len(), "received reply");

        Ok(bytes)
    }

    async fn push(&self, endpoint: &str, message: Vec<u8>) -> Result<(), TransportError> {
        let mut socket = tmq::push(&self.context)
            .set_linger(self.push_linger_ms)
            .connect(endpoint)
            .map_err(|e| TransportError::ConnectionFailed(format!("{endpoint}: {e}")))?;
        debug!(endpoint, "PUSH socket connected");

        trace!(endpoint, bytes = message.len(), "pushing message");
        socket
            .send(Multipart::from(vec![message]))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::time::Duration;

    #[test]
    fn test_transport_creation() {
        let transport = ZmqTransport::new().push_linger_ms(250);
        assert_eq!(transport.push_linger_ms, 250);

        let transport = ZmqTransport::default();
        assert_eq!(transport.push_linger_ms, DEFAULT_PUSH_LINGER_MS);
    }

    #[tokio::test]
    async fn test_inproc_round_trip() {
        let context = tmq::Context::new();
        let endpoint = "inproc://waypoint-round-trip";

        let responder = tmq::reply(&context).set_linger(0).bind(endpoint).unwrap();
        let server = tokio::spawn(async move {
            let (request, sender) = responder.recv().await.unwrap();
            let request: Vec<u8> = request.into_iter().flat_map(|f| f.to_vec()).collect();
            assert_eq!(request, b"ping");
            sender
                .send(Multipart::from(vec![b"pong".to_vec()]))
                .await
                .unwrap();
        });

        let transport = ZmqTransport::with_context(context);
        let reply = transport.call(endpoint, b"ping".to_vec()).await.unwrap();
        assert_eq!(reply, b"pong");

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_inproc_push() {
        let context = tmq::Context::new();
        let endpoint = "inproc://waypoint-push";

        let mut pull = tmq::pull(&context).set_linger(0).bind(endpoint).unwrap();

        let transport = ZmqTransport::with_context(context);
        transport.push(endpoint, b"forget me".to_vec()).await.unwrap();

        let message = tokio::time::timeout(Duration::from_secs(5), pull.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let bytes: Vec<u8> = message.into_iter().flat_map(|f| f.to_vec()).collect();
        assert_eq!(bytes, b"forget me");
    }

    #[tokio::test]
    async fn test_unanswered_call_is_cancelled_by_drop() {
        let context = tmq::Context::new();
        let endpoint = "inproc://waypoint-silent";

        // Bound but never answered.
        let _responder = tmq::reply(&context).set_linger(0).bind(endpoint).unwrap();

        let transport = ZmqTransport::with_context(context);
        let result = tokio::time::timeout(
            Duration::from_millis(50),
            transport.call(endpoint, b"hello?".to_vec()),
        )
        .await;
        assert!(result.is_err());
    }
}
