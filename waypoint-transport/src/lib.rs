//! # waypoint-transport
//!
//! Transport implementations for the Waypoint discovery client.
//!
//! This crate provides:
//! - `ZmqTransport` - ZeroMQ transport (REQ sockets for round trips,
//!   PUSH sockets for fire-and-forget notifications) built on tmq
//! - `ScriptedTransport` - in-memory transport replaying scripted outcomes,
//!   useful for testing and demos
//!
//! ## Socket Lifetime
//!
//! Both transports open a brand-new channel per `call` and per `push`.
//! Nothing is pooled or reused.

mod scripted;
mod zmq;

pub use scripted::{CallRecord, Outcome, ScriptedTransport};
pub use zmq::{DEFAULT_PUSH_LINGER_MS, ZmqTransport};
