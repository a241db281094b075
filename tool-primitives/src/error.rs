//! Failure taxonomy shared by tools, the service, and callers.

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque, thread-safe error used as the cause of a [`ToolError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias used by primitive constructors.
pub type Result<T> = std::result::Result<T, Error>;

/// Result alias returned by tool implementations.
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Errors raised while building or parsing primitive types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Tool metadata failed validation.
    #[error("invalid tool metadata: {reason}")]
    InvalidMetadata {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// A wire string did not name a known [`ToolErrorKind`].
    #[error("unknown tool error kind `{kind}`")]
    UnknownErrorKind {
        /// The offending kind string.
        kind: String,
    },

    /// A wire string did not name a known [`TypeTag`](crate::TypeTag).
    #[error("unknown type tag `{tag}`")]
    UnknownTypeTag {
        /// The offending tag string.
        tag: String,
    },
}

/// Closed set of failure categories a call can end in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    /// The decoded payload does not satisfy the tool's declared input.
    InvalidInput,
    /// The tool signalled a business-logic failure.
    ExecutionError,
    /// Anything unexpected, including bugs and panics inside tool code.
    InternalError,
    /// The tool marked the failure as safe to retry.
    Retryable,
    /// The tool marked the failure as permanent.
    Permanent,
}

impl ToolErrorKind {
    /// Every kind, in wire order.
    pub const ALL: [Self; 5] = [
        Self::InvalidInput,
        Self::ExecutionError,
        Self::InternalError,
        Self::Retryable,
        Self::Permanent,
    ];

    /// Returns the snake_case string carried on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::ExecutionError => "execution_error",
            Self::InternalError => "internal_error",
            Self::Retryable => "retryable",
            Self::Permanent => "permanent",
        }
    }

    /// Returns `true` when callers may safely retry the call.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Retryable)
    }
}

impl Display for ToolErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolErrorKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::UnknownErrorKind {
                kind: value.to_owned(),
            })
    }
}

/// Canonical failure payload of a tool call.
///
/// Every unsuccessful call path ends in exactly one `ToolError`. The optional
/// cause never leaves the process; only `kind` and `message` are transmitted.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ToolError {
    kind: ToolErrorKind,
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl ToolError {
    /// Creates an error of the given kind.
    #[must_use]
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Structurally invalid input.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidInput, message)
    }

    /// Intentional business-logic failure.
    #[must_use]
    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::ExecutionError, message)
    }

    /// Unexpected failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InternalError, message)
    }

    /// Failure the caller may retry.
    #[must_use]
    pub fn retryable(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Retryable, message)
    }

    /// Failure that will not succeed on retry.
    #[must_use]
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Permanent, message)
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ToolErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the attached cause, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_round_trip() {
        for kind in ToolErrorKind::ALL {
            assert_eq!(kind.as_str().parse::<ToolErrorKind>().unwrap(), kind);
        }
        assert_eq!(
            "INVALID_INPUT".parse::<ToolErrorKind>().unwrap(),
            ToolErrorKind::InvalidInput
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "flaky".parse::<ToolErrorKind>().expect_err("should fail");
        assert_eq!(
            err,
            Error::UnknownErrorKind {
                kind: "flaky".into()
            }
        );
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = ToolError::execution("Age cannot be negative");
        assert_eq!(err.to_string(), "execution_error: Age cannot be negative");
        assert!(!err.kind().is_retryable());
        assert!(ToolError::retryable("busy").kind().is_retryable());
    }

    #[test]
    fn cause_is_exposed_as_source() {
        let io = std::io::Error::other("disk full");
        let err = ToolError::internal("write failed").with_cause(io);

        assert_eq!(err.cause().map(ToString::to_string).as_deref(), Some("disk full"));
        assert!(StdError::source(&err).is_some());
    }
}
