//! JSON payload codec shared by server and client.
//!
//! Both encodings carry the same logical object: text payloads hold JSON
//! directly, binary payloads hold the UTF-8 bytes of that JSON.

use std::fmt::{self, Display, Formatter};

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::error::{WireError, WireResult};
use crate::messages::execute_request::Payload;

/// Encoding selected by the caller for a request.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum PayloadEncoding {
    /// JSON text.
    #[default]
    Text,
    /// UTF-8 JSON bytes.
    Binary,
}

impl PayloadEncoding {
    /// Returns the encoding used by the supplied payload.
    #[must_use]
    pub const fn of(payload: &Payload) -> Self {
        match payload {
            Payload::TextPayload(_) => Self::Text,
            Payload::BinaryPayload(_) => Self::Binary,
        }
    }

    /// Returns a short label for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }
}

impl Display for PayloadEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes a request payload into a JSON object.
///
/// # Errors
///
/// Returns [`WireError::InvalidUtf8`], [`WireError::InvalidJson`], or
/// [`WireError::NotAnObject`] when the payload does not hold a JSON object.
pub fn decode_payload(payload: &Payload) -> WireResult<Map<String, Value>> {
    match payload {
        Payload::TextPayload(text) => parse_object(text),
        Payload::BinaryPayload(bytes) => parse_object(std::str::from_utf8(bytes)?),
    }
}

/// Encodes a JSON object with the requested encoding.
///
/// # Errors
///
/// Returns [`WireError::InvalidJson`] if serialisation fails.
pub fn encode_payload(input: &Map<String, Value>, encoding: PayloadEncoding) -> WireResult<Payload> {
    let json = serde_json::to_string(input)?;
    Ok(match encoding {
        PayloadEncoding::Text => Payload::TextPayload(json),
        PayloadEncoding::Binary => Payload::BinaryPayload(Bytes::from(json)),
    })
}

pub(crate) fn parse_object(text: &str) -> WireResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => Err(WireError::NotAnObject {
            found: json_type(&other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
