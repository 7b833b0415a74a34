//! Source Fetch Adapters: object name + kind → raw source text.
//!
//! Uses blocking HTTP via `ureq`; neither front end needs an async client.

use crate::error::FetchError;
use abap_core::config::{SourceConfig, SourceProvider};
use abap_core::error::require_identifier;
use abap_core::model::ObjectKind;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Resolves a logical object to its raw source text.
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, object_name: &str, kind: ObjectKind) -> Result<String, FetchError>;

    /// Where objects come from, for logs and status output.
    fn describe(&self) -> String;
}

/// Build the fetcher selected by `config`, wrapped in a session cache.
pub fn from_config(config: &SourceConfig) -> Result<Box<dyn SourceFetcher>, FetchError> {
    let inner: Box<dyn SourceFetcher> = match config.provider {
        SourceProvider::Local => Box::new(LocalFetcher::new(
            config.local_root.join(&config.path_prefix),
        )),
        SourceProvider::Github => Box::new(GitHubFetcher::from_config(config)?),
    };
    Ok(Box::new(CachedFetcher::new(inner)))
}

// ---------------------------------------------------------------------------
// Local abapGit checkout
// ---------------------------------------------------------------------------

/// Reads `<root>/<file name>`, falling back to a search of the package folders
/// below `root` (abapGit nests sub-packages in directories).
pub struct LocalFetcher {
    root: PathBuf,
}

impl LocalFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn locate(&self, file_name: &str) -> Option<PathBuf> {
        let direct = self.root.join(file_name);
        if direct.is_file() {
            return Some(direct);
        }
        ignore::WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .find(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|n| n.eq_ignore_ascii_case(file_name))
            })
            .map(ignore::DirEntry::into_path)
    }
}

impl SourceFetcher for LocalFetcher {
    fn fetch(&self, object_name: &str, kind: ObjectKind) -> Result<String, FetchError> {
        require_identifier("object_name", object_name)?;
        let file_name = kind.file_name(object_name);
        let Some(path) = self.locate(&file_name) else {
            return Err(FetchError::NotFound {
                kind,
                name: object_name.trim().to_uppercase(),
                location: self.root.join(&file_name).display().to_string(),
            });
        };
        tracing::debug!("reading {}", path.display());
        std::fs::read_to_string(&path).map_err(|source| FetchError::Io { path, source })
    }

    fn describe(&self) -> String {
        format!("local checkout {}", self.root.display())
    }
}

// ---------------------------------------------------------------------------
// GitHub contents API
// ---------------------------------------------------------------------------

/// Fetches raw file contents from `GET /repos/{repo}/contents/{path}?ref={branch}`.
pub struct GitHubFetcher {
    api_url: String,
    repo: String,
    branch: String,
    path_prefix: String,
    token: Option<String>,
    agent: ureq::Agent,
}

impl GitHubFetcher {
    /// The token is read from the environment variable named by `token_env`;
    /// public repositories work without one.
    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        if !config.repo.contains('/') {
            return Err(FetchError::Config(format!(
                "repo must be 'owner/name', got '{}'",
                config.repo
            )));
        }
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_none() {
            tracing::warn!(
                "{} is not set; GitHub requests are unauthenticated",
                config.token_env
            );
        }
        Ok(Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            repo: config.repo.trim().to_string(),
            branch: config.branch.clone(),
            path_prefix: config.path_prefix.trim_matches('/').to_string(),
            token,
            agent: ureq::Agent::new_with_config(
                ureq::config::Config::builder()
                    .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
                    .build(),
            ),
        })
    }

    /// Repository path of an object's file.
    pub fn object_path(&self, object_name: &str, kind: ObjectKind) -> String {
        let file = kind.file_name(object_name);
        if self.path_prefix.is_empty() {
            file
        } else {
            format!("{}/{}", self.path_prefix, file)
        }
    }

    /// Contents API URL for an object. `#` from namespaced names is escaped.
    pub fn object_url(&self, object_name: &str, kind: ObjectKind) -> String {
        format!(
            "{}/repos/{}/contents/{}?ref={}",
            self.api_url,
            self.repo,
            self.object_path(object_name, kind).replace('#', "%23"),
            self.branch
        )
    }
}

impl SourceFetcher for GitHubFetcher {
    fn fetch(&self, object_name: &str, kind: ObjectKind) -> Result<String, FetchError> {
        require_identifier("object_name", object_name)?;
        let url = self.object_url(object_name, kind);
        tracing::debug!("GET {}", url);

        let mut request = self
            .agent
            .get(&url)
            .header("Accept", "application/vnd.github.raw")
            .header("User-Agent", "abap-scope");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let mut response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(404)) => {
                return Err(FetchError::NotFound {
                    kind,
                    name: object_name.trim().to_uppercase(),
                    location: format!(
                        "{}:{}/{}",
                        self.repo,
                        self.branch,
                        self.object_path(object_name, kind)
                    ),
                });
            }
            Err(e) => return Err(FetchError::Http(e.to_string())),
        };

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Http(e.to_string()))
    }

    fn describe(&self) -> String {
        format!("github {}@{}", self.repo, self.branch)
    }
}

// ---------------------------------------------------------------------------
// Session cache
// ---------------------------------------------------------------------------

/// Remembers fetched text for the lifetime of the process.
///
/// Only successful fetches are cached, so a file added to the checkout
/// mid-session is picked up on the next request.
pub struct CachedFetcher {
    inner: Box<dyn SourceFetcher>,
    cache: Mutex<HashMap<(ObjectKind, String), String>>,
}

impl CachedFetcher {
    pub fn new(inner: Box<dyn SourceFetcher>) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn clear(&self) {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl SourceFetcher for CachedFetcher {
    fn fetch(&self, object_name: &str, kind: ObjectKind) -> Result<String, FetchError> {
        let key = (kind, object_name.trim().to_uppercase());
        if let Some(text) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            tracing::debug!("cache hit for {} {}", kind, key.1);
            return Ok(text.clone());
        }

        // The lock is not held across the fetch; concurrent misses both fetch.
        let text = self.inner.fetch(object_name, kind)?;
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, text.clone());
        Ok(text)
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}
