//! Serves one demo tool selected through the environment.
//!
//! ```text
//! TOOLHOST_TOOL_MODULE=demo_tools TOOLHOST_TOOL_NAME=EchoTool cargo run -p tool-server
//! ```

mod tools;

use std::process::ExitCode;

use anyhow::Result;
use toolhost::loader::ToolLoader;
use toolhost::telemetry::{DEFAULT_DIRECTIVE, init_tracing};
use tracing::{error, info};

fn main() -> ExitCode {
    init_tracing(DEFAULT_DIRECTIVE);

    match serve() {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!(error = %err, "tool server failed");
            ExitCode::FAILURE
        }
    }
}

fn serve() -> Result<u8> {
    let loader = ToolLoader::new(tools::catalog()?);
    info!(modules = ?loader.catalog().module_names(), "catalog ready");

    let outcome = toolhost::service::run_from_environment(&loader)?;
    info!(?outcome, "tool server stopped");
    Ok(u8::try_from(outcome.exit_code()).unwrap_or(1))
}
