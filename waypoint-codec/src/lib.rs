//! # waypoint-codec
//!
//! Envelope codec for the Waypoint registry protocol.
//!
//! This crate provides:
//! - `RequestEnvelope` / `ResponseEnvelope` - JSON-RPC style wire envelopes
//! - `encode_find_request` / `encode_invalidate_request` - request builders
//!   that stamp every envelope with a fresh UUID v4 id
//! - `decode_response` - reply parser
//!
//! ## Wire Format
//!
//! ```text
//! find:        {"jsonrpc":"2.0","id":"<uuid>","method":"find","params":"<service>"}
//! invalidate:  {"jsonrpc":"2.0","id":"<uuid>","method":"invalidate","params":{"name":"<service>"}}
//! reply:       {"jsonrpc":"2.0","id":"<uuid>","result":<service record>}
//! ```

mod envelope;

pub use envelope::{
    JSONRPC_VERSION, Method, Params, RequestEnvelope, ResponseEnvelope, decode_response,
    encode_find_request, encode_invalidate_request,
};
