//! abap-scope MCP server.
//! Exposes method listing, method source, class/interface definitions, raw source
//! and dependency reports for ABAP objects as MCP tools over stdio.

mod helpers;
mod params;
mod server;
mod tools;

use anyhow::{Context, Result};
use rmcp::ServiceExt;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::server::ScopeServer;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let project_root = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => std::env::current_dir().context("failed to get current directory")?,
    };

    let config = abap_core::config::ScopeConfig::load(&project_root)
        .with_context(|| format!("loading config for {}", project_root.display()))?;
    let server = ScopeServer::new(project_root, &config)?;
    tracing::info!("abap-scope MCP server starting, source: {}", server.source_label());

    let service = server
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!("serve error: {}", e))
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    service.waiting().await?;

    Ok(())
}
