//! Errors raised while translating between wire messages and primitives.

use thiserror::Error;

/// Result alias for wire conversions.
pub type WireResult<T> = Result<T, WireError>;

/// Failures decoding or encoding wire payloads.
#[derive(Debug, Error)]
pub enum WireError {
    /// The request carried neither a text nor a binary payload.
    #[error("request payload is missing")]
    MissingPayload,

    /// The response carried neither a result nor an error.
    #[error("response carried neither a result nor an error")]
    MissingOutcome,

    /// Binary payload bytes were not valid UTF-8.
    #[error("binary payload is not valid UTF-8: {source}")]
    InvalidUtf8 {
        /// Underlying decoding error.
        #[from]
        source: std::str::Utf8Error,
    },

    /// Payload text was not valid JSON.
    #[error("payload is not valid JSON: {source}")]
    InvalidJson {
        /// Underlying parse error.
        #[from]
        source: serde_json::Error,
    },

    /// Payload parsed but was not a JSON object.
    #[error("payload must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A primitive field carried an unknown value.
    #[error(transparent)]
    Primitive(#[from] tool_primitives::Error),
}
