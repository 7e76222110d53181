//! Error types for initialization and dispatch.

use std::sync::Arc;
use thiserror::Error;

/// A mandatory credential was not configured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name} is required. Set {env} environment variable.\nGet an API key from: {url}")]
pub struct CredentialError {
    /// Human-readable credential name, e.g. `OpenRouter API key`.
    pub name: &'static str,
    /// Environment variable the credential is read from.
    pub env: &'static str,
    /// Where an operator can obtain the credential.
    pub url: &'static str,
}

/// Errors raised while constructing the agent.
///
/// Cloneable so that one failed attempt can be delivered to every caller
/// that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum InitError {
    /// A mandatory credential is missing.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Any other construction failure.
    #[error("agent setup failed: {0:#}")]
    Setup(Arc<anyhow::Error>),

    /// The construction task panicked or was cancelled.
    #[error("agent initialization aborted: {0}")]
    Aborted(String),
}

impl InitError {
    /// Wrap an arbitrary construction failure.
    pub fn setup(err: impl Into<anyhow::Error>) -> Self {
        Self::Setup(Arc::new(err.into()))
    }
}

/// Errors surfaced by [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Error)]
pub enum Error {
    /// Initialization failed.
    #[error(transparent)]
    Init(#[from] InitError),

    /// The forwarding step ran before any agent was constructed.
    #[error("agent not initialized")]
    NotInitialized,

    /// The agent (or a service behind it) failed.
    #[error(transparent)]
    Agent(#[from] anyhow::Error),
}

/// Result type alias for dispatcher operations.
pub type Result<T> = std::result::Result<T, Error>;
