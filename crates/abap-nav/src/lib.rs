//! Source retrieval and the composed lookups shared by the CLI and MCP server.
//!
//! A [`fetch::SourceFetcher`] resolves an object name and kind to raw text
//! (local abapGit checkout or the GitHub contents API). [`ops::Navigator`]
//! runs fetch → comment strip → extraction and returns serializable results;
//! [`scan`] reports on every class of a local checkout at once.

pub mod error;
pub mod fetch;
pub mod ops;
pub mod scan;
