//! `ScopeServer` state, the blocking-call bridge, and the `ServerHandler` impl.

use abap_core::config::ScopeConfig;
use abap_nav::error::NavError;
use abap_nav::ops::Navigator;
use rmcp::{ServerHandler, model::ServerInfo, tool_handler};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::helpers;

/// The MCP server state.
#[derive(Clone)]
pub(crate) struct ScopeServer {
    pub(crate) project_root: PathBuf,
    pub(crate) navigator: Arc<Navigator>,
    pub(crate) tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl std::fmt::Debug for ScopeServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeServer")
            .field("project_root", &self.project_root)
            .field("source", &self.navigator.describe())
            .finish()
    }
}

impl ScopeServer {
    pub(crate) fn new(project_root: PathBuf, config: &ScopeConfig) -> anyhow::Result<Self> {
        let navigator = Navigator::from_config(config)?;
        Ok(Self {
            project_root,
            navigator: Arc::new(navigator),
            tool_router: Self::create_tool_router(),
        })
    }

    pub(crate) fn source_label(&self) -> String {
        self.navigator.describe()
    }

    /// Run a lookup on the blocking pool (fetches may do file or HTTP I/O)
    /// and render its result as the tool response.
    pub(crate) async fn run<T, F>(&self, op: F) -> Result<String, String>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(&Navigator) -> Result<T, NavError> + Send + 'static,
    {
        let navigator = Arc::clone(&self.navigator);
        let result = tokio::task::spawn_blocking(move || op(&navigator))
            .await
            .map_err(|e| helpers::error_payload("internal", &format!("task failed: {}", e)))?;
        helpers::render(result)
    }
}

#[tool_handler]
impl ServerHandler for ScopeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(include_str!("prompts/server_instructions.md").into()),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
