//! Tool model for the toolhost service.
//!
//! A [`Tool`] is one of two variants chosen once at construction time: a
//! [`FunctionTool`] invoked with named arguments, or a [`StructuredTool`]
//! whose typed input is validated before `execute` runs. Tools are collected
//! into an immutable [`ToolRegistry`] at startup.

#![warn(missing_docs, clippy::pedantic)]

pub mod function;
pub mod reflect;
pub mod registry;
pub mod shape;
pub mod tool;

pub use function::{
    Arguments, BoxToolFuture, FunctionHandler, FunctionTool, FunctionToolBuilder, Parameter,
};
pub use reflect::describe;
pub use registry::{RegistryError, RegistryResult, ToolRegistry, ToolRegistryBuilder};
pub use shape::InputShape;
pub use tool::{StructuredTool, StructuredToolHandle, Tool};
