//! Errors surfaced to CLI and tool callers.

use abap_core::error::AnalysisError;
use abap_core::model::ObjectKind;
use std::path::PathBuf;

/// Failures of a source fetch adapter.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{kind} {name} not found at {location}")]
    NotFound {
        kind: ObjectKind,
        name: String,
        location: String,
    },
    #[error(transparent)]
    InvalidArgument(#[from] AnalysisError),
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("source configuration: {0}")]
    Config(String),
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidArgument(inner) => inner.kind(),
            Self::Http(_) => "http",
            Self::Config(_) => "config",
            Self::Io { .. } => "io",
        }
    }
}

/// Either side of a composed lookup: the fetch or the extraction.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl NavError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(e) => e.kind(),
            Self::Analysis(e) => e.kind(),
        }
    }

    /// `{"kind": ..., "message": ...}` for tool-layer callers.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        })
    }
}
