//! Client for the toolhost RPC service.
//!
//! ```no_run
//! # async fn demo() -> tool_client::ClientResult<()> {
//! use serde_json::json;
//! use tool_client::{ClientConfig, ToolClient};
//!
//! let mut client = ToolClient::connect(ClientConfig::new("localhost:50051")).await?;
//! let input = json!({"message": "hi"}).as_object().cloned().unwrap_or_default();
//! let result = client.execute("echo", &input).await?;
//! println!("{}", result.content());
//! client.close();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, clippy::pedantic)]

mod client;
mod error;

pub use client::{ClientConfig, ToolClient, run};
pub use error::{ClientError, ClientResult, RPC_ERROR};
