//! Scripted in-memory transport.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use waypoint_core::{Transport, TransportError};

/// What a scripted round trip does.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Reply immediately with the given payload.
    Reply(Vec<u8>),

    /// Reply with the given payload after a delay.
    ReplyAfter(Duration, Vec<u8>),

    /// Fail with a transport error.
    Fail(TransportError),

    /// Never reply.
    Hang,
}

/// A message observed by the scripted transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    /// Endpoint the message was addressed to.
    pub endpoint: String,

    /// Raw payload.
    pub payload: Vec<u8>,
}

/// A transport that replays scripted outcomes.
///
/// Each `call` pops the next [`Outcome`] from the script; once the script
/// is empty every call fails. Every call and push is recorded so tests can
/// assert on exactly what went over the wire.
///
/// ## Example
///
/// ```rust
/// use waypoint_transport::{Outcome, ScriptedTransport};
///
/// let transport = ScriptedTransport::new()
///     .then(Outcome::Hang)
///     .then(Outcome::Reply(br#"{"id":"1","result":"tcp://10.0.0.4:80"}"#.to_vec()));
///
/// assert_eq!(transport.remaining(), 2);
/// assert_eq!(transport.call_count(), 0);
/// ```
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Outcome>>,
    calls: Mutex<Vec<CallRecord>>,
    pushes: Mutex<Vec<CallRecord>>,
    fail_pushes: AtomicBool,
}

impl ScriptedTransport {
    /// Create a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            pushes: Mutex::new(Vec::new()),
            fail_pushes: AtomicBool::new(false),
        }
    }

    /// Append an outcome to the script.
    #[must_use]
    pub fn then(self, outcome: Outcome) -> Self {
        self.script.lock().push_back(outcome);
        self
    }

    /// Append an outcome to the script of a shared transport.
    pub fn enqueue(&self, outcome: Outcome) {
        self.script.lock().push_back(outcome);
    }

    /// Make every subsequent push fail (or succeed again).
    pub fn fail_pushes(&self, fail: bool) {
        self.fail_pushes.store(fail, Ordering::Relaxed);
    }

    /// Number of outcomes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }

    /// All round trips issued so far.
    #[must_use]
    pub fn calls(&self) -> Vec<CallRecord> {
        self.calls.lock().clone()
    }

    /// Number of round trips issued so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// All pushes issued so far, including failed ones.
    #[must_use]
    pub fn pushes(&self) -> Vec<CallRecord> {
        self.pushes.lock().clone()
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ScriptedTransport {
    async fn call(&self, endpoint: &str, request: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.calls.lock().push(CallRecord {
            endpoint: endpoint.to_string(),
            payload: request,
        });

        let outcome = self.script.lock().pop_front();
        match outcome {
            Some(Outcome::Reply(payload)) => Ok(payload),
            Some(Outcome::ReplyAfter(delay, payload)) => {
                tokio::time::sleep(delay).await;
                Ok(payload)
            }
            Some(Outcome::Fail(error)) => Err(error),
            Some(Outcome::Hang) => std::future::pending().await,
            None => Err(TransportError::ConnectionFailed(format!(
                "{endpoint}: script exhausted"
            ))),
        }
    }

    async fn push(&self, endpoint: &str, message: Vec<u8>) -> Result<(), TransportError> {
        self.pushes.lock().push(CallRecord {
            endpoint: endpoint.to_string(),
            payload: message,
        });

        if self.fail_pushes.load(Ordering::Relaxed) {
            return Err(TransportError::Send(format!("{endpoint}: push refused")));
        }
        Ok(())
    }
}
