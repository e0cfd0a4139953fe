//! Metron MCP Server
//!
//! Line-delimited JSON-RPC over stdio. Logs go to stderr so stdout carries
//! protocol messages only.
//!
//! Tools:
//! - list_categories: Categories and their conversion strategy
//! - list_units: Units of one category
//! - convert: Convert a value between two units
//! - convert_expression: Convert "100 km to mi" style text
//!
//! Resources:
//! - metron://units/{category} - Unit table for a category

mod config;
mod handlers;
mod protocol;

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use crate::config::ServerConfig;
use crate::handlers::{ServerState, PROTOCOL_VERSION, SERVER_VERSION};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env();
    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Metron MCP server starting");
    info!(?config, "configuration loaded");

    let state = ServerState::from_config(&config)?;
    state.refresh_currencies().await;

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    info!(tools = state.tools().len(), "server ready, waiting for requests");

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("client disconnected (EOF)");
                break;
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(response) = state.handle_line(line).await else {
            continue;
        };

        let mut out = response.to_line();
        out.push('\n');
        if let Err(e) = stdout.write_all(out.as_bytes()).await {
            error!(error = %e, "error writing response");
            break;
        }
        if let Err(e) = stdout.flush().await {
            error!(error = %e, "error flushing stdout");
            break;
        }
    }

    info!("server shutting down");
    Ok(())
}
