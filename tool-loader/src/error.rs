//! Loader error types.

use std::path::PathBuf;

use thiserror::Error;
use tool_primitives::BoxError;

/// Result alias for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors raised while resolving a tool. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Required configuration is missing or malformed.
    #[error("invalid tool configuration: {reason}")]
    Configuration {
        /// Human-readable reason.
        reason: String,
    },

    /// The spec file could not be read.
    #[error("failed to read tool spec `{}`", path.display())]
    SpecRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The spec file is not valid YAML or lacks the `tool` section.
    #[error("invalid tool spec `{}`: {source}", path.display())]
    SpecFormat {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_yaml::Error,
    },

    /// No module with the requested identifier is known.
    #[error("tool module `{module}` not found")]
    ModuleNotFound {
        /// Requested module identifier.
        module: String,
    },

    /// The module has no entry with the requested symbol.
    #[error("symbol `{symbol}` not found in tool module `{module}`")]
    SymbolNotFound {
        /// Module that was searched.
        module: String,
        /// Requested symbol.
        symbol: String,
    },

    /// A factory or constructor rejected the configured arguments.
    #[error("failed to create tool `{symbol}`: {source}")]
    Construction {
        /// Symbol being constructed.
        symbol: String,
        /// Failure reported by the factory or constructor.
        #[source]
        source: BoxError,
    },
}

impl LoaderError {
    /// Creates a configuration error from the supplied reason.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}
