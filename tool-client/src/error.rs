//! Client-side error type.

use thiserror::Error;
use tool_primitives::ToolError;
use tool_wire::WireError;

/// Kind reported for failures outside the tool boundary.
pub const RPC_ERROR: &str = "RPC_ERROR";

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures observed by a caller.
///
/// [`ClientError::Tool`] carries the tool's own error; every other variant is
/// a transport-level failure reported with the [`RPC_ERROR`] kind.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-OK status, including exceeded deadlines.
    #[error("RPC_ERROR: {}", .status.message())]
    Rpc {
        /// Status returned by the transport.
        #[source]
        status: Box<tonic::Status>,
    },

    /// The connection could not be established.
    #[error("RPC_ERROR: failed to connect to {address}")]
    Connect {
        /// Address that was dialled.
        address: String,
        /// Underlying transport failure.
        #[source]
        source: tonic::transport::Error,
    },

    /// The client was used after [`crate::ToolClient::close`].
    #[error("RPC_ERROR: client is closed")]
    Closed,

    /// The request or response could not be translated.
    #[error("RPC_ERROR: {0}")]
    Wire(#[from] WireError),

    /// The tool reported a failure.
    #[error(transparent)]
    Tool(#[from] ToolError),
}

impl ClientError {
    /// Returns the error kind: the tool's kind for tool failures and
    /// [`RPC_ERROR`] otherwise.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Tool(error) => error.kind().as_str(),
            _ => RPC_ERROR,
        }
    }

    /// Returns `true` for failures outside the tool boundary.
    #[must_use]
    pub fn is_rpc_error(&self) -> bool {
        !matches!(self, Self::Tool(_))
    }

    /// Returns the tool error, if the tool reported one.
    #[must_use]
    pub fn tool_error(&self) -> Option<&ToolError> {
        match self {
            Self::Tool(error) => Some(error),
            _ => None,
        }
    }

    /// Returns the transport status, if the service answered with one.
    #[must_use]
    pub fn status(&self) -> Option<&tonic::Status> {
        match self {
            Self::Rpc { status } => Some(status.as_ref()),
            _ => None,
        }
    }
}

impl From<tonic::Status> for ClientError {
    fn from(status: tonic::Status) -> Self {
        Self::Rpc {
            status: Box::new(status),
        }
    }
}
