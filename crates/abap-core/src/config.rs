//! Configuration for source retrieval and analysis limits.
//!
//! Load order: `.abapscope/config.toml` → environment variables → defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level abap-scope configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub source: SourceConfig,
    pub analysis: AnalysisConfig,
}

/// Where object source text is fetched from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceProvider {
    /// An abapGit checkout on the local filesystem.
    #[default]
    Local,
    /// The GitHub contents API.
    Github,
}

impl std::str::FromStr for SourceProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "github" => Ok(Self::Github),
            other => Err(format!("unknown source provider '{}'", other)),
        }
    }
}

/// Source fetch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub provider: SourceProvider,
    /// Checkout root for the local provider. Relative paths resolve against the project root.
    pub local_root: PathBuf,
    /// `owner/name` of the GitHub repository.
    pub repo: String,
    pub branch: String,
    /// Folder inside the repository holding the abapGit object files.
    pub path_prefix: String,
    pub api_url: String,
    /// Name of the environment variable holding the access token.
    /// The token itself never lives in the config file.
    pub token_env: String,
    pub timeout_secs: u64,
}

/// Limits and execution settings for the extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Source units larger than this are rejected before scanning.
    pub max_input_bytes: usize,
    /// Analyze the methods of one class on the rayon pool.
    pub parallel: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            provider: SourceProvider::Local,
            local_root: PathBuf::from("."),
            repo: String::new(),
            branch: "main".to_string(),
            path_prefix: "src".to_string(),
            api_url: "https://api.github.com".to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 4 * 1024 * 1024,
            parallel: true,
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

/// Path of the config file for a project root.
pub fn config_file(project_root: &Path) -> PathBuf {
    project_root.join(".abapscope").join("config.toml")
}

impl ScopeConfig {
    /// Load config from `.abapscope/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = config_file(project_root);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env();

        if config.source.local_root.is_relative() {
            config.source.local_root = project_root.join(&config.source.local_root);
        }
        config.source.path_prefix = config.source.path_prefix.trim_matches('/').to_string();

        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        env_override("ABAPSCOPE_PROVIDER", &mut self.source.provider);
        env_override("ABAPSCOPE_LOCAL_ROOT", &mut self.source.local_root);
        env_override("ABAPSCOPE_REPO", &mut self.source.repo);
        env_override("ABAPSCOPE_BRANCH", &mut self.source.branch);
        env_override("ABAPSCOPE_PATH_PREFIX", &mut self.source.path_prefix);
        env_override("ABAPSCOPE_API_URL", &mut self.source.api_url);
        env_override("ABAPSCOPE_TIMEOUT_SECS", &mut self.source.timeout_secs);
        env_override(
            "ABAPSCOPE_MAX_INPUT_BYTES",
            &mut self.analysis.max_input_bytes,
        );
    }

    /// Reject settings that would make every fetch or analysis fail later.
    pub fn validate(&self) -> Result<()> {
        if self.source.provider == SourceProvider::Github {
            let repo = self.source.repo.trim();
            let valid = repo
                .split_once('/')
                .is_some_and(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'));
            if !valid {
                anyhow::bail!(
                    "source.repo must be 'owner/name' when provider is github (got '{}')",
                    self.source.repo
                );
            }
        }
        if self.analysis.max_input_bytes == 0 {
            anyhow::bail!("analysis.max_input_bytes must be greater than zero");
        }
        Ok(())
    }
}
