//! Credential and model resolution.
//!
//! Values come from explicit [`Overrides`] (CLI flags) first, then from
//! the environment. Empty values count as unset.

use rcore::CredentialError;

/// Environment variable holding the OpenRouter key.
pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
/// Environment variable holding the Exa key.
pub const EXA_API_KEY: &str = "EXA_API_KEY";
/// Environment variable holding the Mem0 key.
pub const MEM0_API_KEY: &str = "MEM0_API_KEY";
/// Environment variable holding the Mem0 user id.
pub const MEM0_USER_ID: &str = "MEM0_USER_ID";
/// Environment variable holding the model id.
pub const MODEL_NAME: &str = "MODEL_NAME";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

/// Mem0 user id used when none is configured.
pub const DEFAULT_MEMORY_USER: &str = "reel";

/// The model provider key is required.
pub const MISSING_OPENROUTER_KEY: CredentialError = CredentialError {
    name: "OpenRouter API key",
    env: OPENROUTER_API_KEY,
    url: "https://openrouter.ai/keys",
};

/// The search key is required.
pub const MISSING_EXA_KEY: CredentialError = CredentialError {
    name: "Exa API key",
    env: EXA_API_KEY,
    url: "https://exa.ai",
};

/// Explicit values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// OpenRouter API key.
    pub openrouter_api_key: Option<String>,
    /// Exa API key.
    pub exa_api_key: Option<String>,
    /// Mem0 API key.
    pub mem0_api_key: Option<String>,
    /// Model id.
    pub model: Option<String>,
}

/// Fully resolved settings used to construct the agent.
#[derive(Clone)]
pub struct Settings {
    /// OpenRouter API key.
    pub openrouter_api_key: String,
    /// Exa API key.
    pub exa_api_key: String,
    /// Mem0 API key; attaches the memory tools when present.
    pub mem0_api_key: Option<String>,
    /// Mem0 user id memories are scoped to.
    pub memory_user: String,
    /// Model id.
    pub model: String,
}

impl Settings {
    /// Resolve settings from overrides and the process environment.
    pub fn from_env(overrides: &Overrides) -> Result<Self, CredentialError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve settings from overrides and a variable lookup.
    ///
    /// Fails on the first missing mandatory credential, provider key first.
    pub fn resolve(
        overrides: &Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CredentialError> {
        let pick = |explicit: &Option<String>, env: &str| {
            explicit
                .clone()
                .or_else(|| lookup(env))
                .filter(|value| !value.trim().is_empty())
        };

        let openrouter_api_key =
            pick(&overrides.openrouter_api_key, OPENROUTER_API_KEY).ok_or(MISSING_OPENROUTER_KEY)?;
        let exa_api_key = pick(&overrides.exa_api_key, EXA_API_KEY).ok_or(MISSING_EXA_KEY)?;

        Ok(Self {
            openrouter_api_key,
            exa_api_key,
            mem0_api_key: pick(&overrides.mem0_api_key, MEM0_API_KEY),
            memory_user: pick(&None, MEM0_USER_ID).unwrap_or_else(|| DEFAULT_MEMORY_USER.into()),
            model: pick(&overrides.model, MODEL_NAME).unwrap_or_else(|| DEFAULT_MODEL.into()),
        })
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("model", &self.model)
            .field("memory", &self.mem0_api_key.is_some())
            .field("memory_user", &self.memory_user)
            .finish_non_exhaustive()
    }
}
