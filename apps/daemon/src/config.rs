//! Agent deployment configuration loaded from `agent_config.json`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name looked up in the search paths.
pub const CONFIG_FILE: &str = "agent_config.json";

/// Address served when no deployment url is configured.
pub const DEFAULT_URL: &str = "http://127.0.0.1:3773";

/// Top-level agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Agent identifier.
    pub name: String,
    /// One-line description shown in the agent card.
    pub description: String,
    /// Agent version.
    pub version: String,
    /// Where and how the agent is served.
    pub deployment: Deployment,
    /// Environment variables the agent reads.
    pub environment_variables: Vec<EnvVar>,
}

/// Deployment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deployment {
    /// Public URL of the agent.
    pub url: String,
    /// Whether the agent card is served at `/.well-known/agent.json`.
    pub expose: bool,
    /// Agent protocol version.
    pub protocol_version: String,
    /// Hosts allowed to proxy requests. Not enforced here; kept for the
    /// reverse proxy in front of the daemon.
    pub proxy_urls: Vec<String>,
    /// Allowed CORS origins; `*` allows any.
    pub cors_origins: Vec<String>,
}

/// A documented environment variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVar {
    /// Variable name.
    pub key: String,
    /// What it configures.
    #[serde(default)]
    pub description: String,
    /// Whether startup requires it.
    #[serde(default)]
    pub required: bool,
}

impl EnvVar {
    fn new(key: &str, description: &str, required: bool) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            required,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "movie-recommender-agent".into(),
            description: "AI-powered movie recommendation system with personalized suggestions"
                .into(),
            version: "1.0.0".into(),
            deployment: Deployment::default(),
            environment_variables: vec![
                EnvVar::new(
                    "OPENROUTER_API_KEY",
                    "OpenRouter API key for LLM calls (required)",
                    true,
                ),
                EnvVar::new("MODEL_NAME", "Model ID for OpenRouter", false),
                EnvVar::new(
                    "EXA_API_KEY",
                    "Exa API key for movie information search (required)",
                    true,
                ),
                EnvVar::new("MEM0_API_KEY", "Mem0 API key for memory operations", false),
            ],
        }
    }
}

impl Default for Deployment {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.into(),
            expose: true,
            protocol_version: "1.0.0".into(),
            proxy_urls: vec!["127.0.0.1".into()],
            cors_origins: vec!["*".into()],
        }
    }
}

impl AgentConfig {
    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse agent config")
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// Load the first readable config among `paths`, falling back to the
    /// built-in default. Unreadable or malformed files are skipped.
    pub fn discover<P: AsRef<Path>>(paths: &[P]) -> Self {
        for path in paths.iter().map(AsRef::as_ref) {
            if !path.exists() {
                continue;
            }
            match Self::load(path) {
                Ok(config) => {
                    tracing::info!("loaded configuration from {}", path.display());
                    return config;
                }
                Err(e) => tracing::warn!("skipping {}: {e:#}", path.display()),
            }
        }
        tracing::info!("no {CONFIG_FILE} found, using defaults");
        Self::default()
    }

    /// The host and port the deployment url points at.
    pub fn bind_address(&self) -> String {
        let url = self.deployment.url.as_str();
        let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
        rest.split('/').next().unwrap_or(rest).to_owned()
    }
}

/// Config search order: the explicit path, the working directory, then the
/// directory holding the executable.
pub fn search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }
    paths.push(PathBuf::from(CONFIG_FILE));
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(dir.join(CONFIG_FILE));
    }
    paths
}
