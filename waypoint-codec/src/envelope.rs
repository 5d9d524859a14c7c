//! Request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use waypoint_core::{CodecError, ServiceRecord};

/// Protocol version stamped on every outgoing envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// Registry method invoked by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Look up the record of a service.
    Find,
    /// Drop a service from the registry's view.
    Invalidate,
}

impl Method {
    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Find => "find",
            Self::Invalidate => "invalidate",
        }
    }
}

/// Request parameters.
///
/// `find` carries the bare service name, `invalidate` carries an object
/// with a `name` member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    /// Bare service name.
    Name(String),
    /// Object carrying the service name.
    Service {
        /// Service name.
        name: String,
    },
}

impl Params {
    /// Service name carried by the parameters.
    #[must_use]
    pub fn service(&self) -> &str {
        match self {
            Self::Name(name) | Self::Service { name } => name,
        }
    }
}

/// Request envelope sent to a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Protocol version.
    pub jsonrpc: String,

    /// Unique request id, never reused.
    pub id: String,

    /// Registry method.
    pub method: Method,

    /// Method parameters.
    pub params: Params,
}

impl RequestEnvelope {
    /// Create an envelope with a fresh UUID v4 id.
    #[must_use]
    pub fn new(method: Method, params: Params) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Uuid::new_v4().to_string(),
            method,
            params,
        }
    }

    /// Serialize the envelope to JSON wire bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(self).map_err(|e| CodecError::Serialization(e.to_string()))
    }
}

/// Response envelope received in reply to a `find` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Id echoed by the registry. Not checked against the request id.
    pub id: Value,

    /// Record of the requested service.
    pub result: ServiceRecord,
}

impl ResponseEnvelope {
    /// Create a reply for the request with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>, result: ServiceRecord) -> Self {
        Self {
            id: Value::String(id.into()),
            result,
        }
    }

    /// Serialize the envelope to JSON wire bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut object = serde_json::Map::new();
        object.insert("jsonrpc".to_string(), Value::from(JSONRPC_VERSION));
        object.insert("id".to_string(), self.id.clone());
        object.insert("result".to_string(), self.result.as_value().clone());
        serde_json::to_vec(&Value::Object(object))
            .map_err(|e| CodecError::Serialization(e.to_string()))
    }
}

/// Build a `find` request for `service`.
#[must_use]
pub fn encode_find_request(service: &str) -> RequestEnvelope {
    RequestEnvelope::new(Method::Find, Params::Name(service.to_string()))
}

/// Build an `invalidate` request for `service`.
#[must_use]
pub fn encode_invalidate_request(service: &str) -> RequestEnvelope {
    RequestEnvelope::new(
        Method::Invalidate,
        Params::Service {
            name: service.to_string(),
        },
    )
}

/// Parse a reply payload and extract its `result`.
///
/// Any member other than `id` and `result` is ignored.
pub fn decode_response(payload: &[u8]) -> Result<ResponseEnvelope, CodecError> {
    let value: Value =
        serde_json::from_slice(payload).map_err(|e| CodecError::Malformed(e.to_string()))?;

    let Value::Object(mut object) = value else {
        return Err(CodecError::Malformed("expected a JSON object".to_string()));
    };

    let result = object
        .remove("result")
        .ok_or(CodecError::MissingField("result"))?;
    let id = object.remove("id").unwrap_or(Value::Null);

    Ok(ResponseEnvelope {
        id,
        result: ServiceRecord::new(result),
    })
}
