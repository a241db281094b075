//! Startup-time tool resolution for toolhost.
//!
//! A [`ToolConfig`] names a module and a symbol. The [`ToolLoader`] resolves
//! that pair against an explicit [`ToolCatalog`], builds the tool with the
//! configured arguments, and hands it to the service. Configuration comes
//! from environment variables or a `toolspec.yaml` file.

#![warn(missing_docs, clippy::pedantic)]

mod catalog;
mod config;
pub mod env;
mod error;
mod loader;
mod spec;

pub use catalog::{Symbol, ToolCatalog, ToolModule};
pub use config::ToolConfig;
pub use env::{EnvSource, ProcessEnv};
pub use error::{LoaderError, LoaderResult};
pub use loader::ToolLoader;
pub use spec::{ToolArg, ToolSection, ToolSpec, read_tool_args};
