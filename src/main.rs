//! taskdeck-mcp - MCP server entry point.
//!
//! Serves the task-management tools over stdio using JSON-RPC 2.0, one
//! message per line. Diagnostics go to stderr; stdout carries the protocol.

use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskdeck::config::Config;
use taskdeck::manager::TaskManager;
use taskdeck::protocol::{JsonRpcRequest, JsonRpcResponse, PARSE_ERROR};
use taskdeck::server::McpServer;
use taskdeck::store::InMemoryStore;
use taskdeck::tools::ToolRegistry;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdeck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    info!(seed = config.seed, "starting taskdeck MCP server");

    let store = if config.seed {
        InMemoryStore::seeded(Utc::now())
    } else {
        InMemoryStore::new()
    };
    let manager = Arc::new(TaskManager::new(Arc::new(store)));
    let server = McpServer::new(ToolRegistry::new(manager, &config));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let reader = BufReader::new(stdin.lock());

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                let response =
                    JsonRpcResponse::error(serde_json::Value::Null, PARSE_ERROR, e.to_string());
                write_response(&mut stdout, &response);
                continue;
            }
        };

        if let Some(response) = runtime.block_on(server.handle(request)) {
            write_response(&mut stdout, &response);
        }
    }

    Ok(())
}

fn write_response(stdout: &mut std::io::Stdout, response: &JsonRpcResponse) {
    if let Ok(serialized) = serde_json::to_string(response) {
        let _ = writeln!(stdout, "{}", serialized);
        let _ = stdout.flush();
    }
}
