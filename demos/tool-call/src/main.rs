//! Command-line caller for a running tool service.
//!
//! ```text
//! tool-call schema echo
//! tool-call execute echo '{"message": "hi"}' --binary --timeout 5
//! ```

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value, json};
use toolhost::client::{ClientConfig, ClientError, ToolClient};
use toolhost::telemetry::init_tracing;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "tool-call")]
#[command(about = "Call a tool hosted by a toolhost service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Service address as `host:port` or a full URI.
    #[arg(long, default_value = "localhost:50051")]
    address: String,

    /// Per-call deadline in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the input schema of a tool.
    Schema {
        /// Registered tool name.
        tool: String,
    },

    /// Run a tool with a JSON object as input.
    Execute {
        /// Registered tool name.
        tool: String,

        /// Input object, for example `{"message": "hi"}`.
        #[arg(default_value = "{}")]
        input: String,

        /// Send the payload as bytes instead of text.
        #[arg(long)]
        binary: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::new(cli.address);
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    match cli.command {
        Commands::Schema { tool } => cmd_schema(config, &tool).await,
        Commands::Execute {
            tool,
            input,
            binary,
        } => cmd_execute(config.with_binary(binary), &tool, &input).await,
    }
}

async fn cmd_schema(config: ClientConfig, tool: &str) -> Result<()> {
    let mut client = ToolClient::connect(config).await?;
    let schema = client.get_tool_schema(tool).await?;
    client.close();

    let fields: Vec<Value> = schema
        .fields()
        .iter()
        .map(|field| {
            json!({
                "name": field.name(),
                "type": field.type_tag().as_str(),
                "required": field.required(),
                "description": field.description(),
            })
        })
        .collect();
    let rendered = json!({
        "tool_name": schema.tool_name(),
        "description": schema.description(),
        "fields": fields,
    });
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

async fn cmd_execute(config: ClientConfig, tool: &str, input: &str) -> Result<()> {
    let input = parse_input(input)?;
    debug!(tool, fields = input.len(), "sending execute request");

    match toolhost::client::run(config, tool, &input).await {
        Ok(result) => {
            println!("{}", result.content());
            if let Some(metadata) = result.metadata() {
                println!("{}", serde_json::to_string_pretty(metadata)?);
            }
            if let Some(error) = result.error() {
                eprintln!("warning: {error}");
            }
            Ok(())
        }
        Err(ClientError::Tool(error)) => bail!("tool failed with {error}"),
        Err(err) => Err(err.into()),
    }
}

fn parse_input(input: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(input).context("input is not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("input must be a JSON object, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_must_be_an_object() {
        assert_eq!(parse_input(r#"{"a": 1}"#).unwrap().len(), 1);
        assert!(parse_input("[1]").is_err());
        assert!(parse_input("nope").is_err());
    }

    #[test]
    fn execute_flags_parse() {
        let cli = Cli::parse_from([
            "tool-call",
            "--timeout",
            "3",
            "execute",
            "echo",
            r#"{"message":"hi"}"#,
            "--binary",
        ]);
        assert_eq!(cli.timeout, Some(3));
        assert!(matches!(cli.command, Commands::Execute { binary: true, .. }));
    }
}
