//! Observability utilities for toolhost binaries.

#![warn(missing_docs, clippy::pedantic)]

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Installs the global fmt subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `default_directive`.
/// Returns `false` when a subscriber was already installed, which leaves the
/// existing one in place.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(default_directive, "tracing subscriber installed");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_harmless() {
        init_tracing(DEFAULT_DIRECTIVE);
        assert!(!init_tracing("debug"));
    }
}
