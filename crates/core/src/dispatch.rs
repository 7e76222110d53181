//! Request dispatch over a lazily constructed agent.

use crate::{Conversation, Gate, InitError, error::Error, error::Result};
use std::{future::Future, sync::Arc};

/// A constructed, ready-to-use agent.
///
/// Implementations wrap a model client and its tools. The dispatcher never
/// inspects [`Agent::Response`]; it is returned to the caller as-is.
pub trait Agent: Send + Sync + 'static {
    /// The result of a run.
    type Response: Send;

    /// Run the agent over a conversation.
    fn run(
        &self,
        conversation: Conversation,
    ) -> impl Future<Output = anyhow::Result<Self::Response>> + Send;

    /// Release resources held by the agent. Called from the host's shutdown
    /// path; may be called more than once.
    fn cleanup(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// Forwards conversations to an agent that is constructed on first use.
///
/// Construct one per process and share it (e.g. behind an `Arc` in server
/// state).
pub struct Dispatcher<A: Agent> {
    gate: Gate<A>,
}

impl<A: Agent> Dispatcher<A> {
    /// Create a dispatcher that builds its agent with `init` on first use.
    pub fn new<F, Fut>(init: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<A, InitError>> + Send + 'static,
    {
        let init = Arc::new(init);
        Self {
            gate: Gate::new(move || {
                let init = Arc::clone(&init);
                async move {
                    tracing::info!("initializing agent");
                    let agent = init().await?;
                    tracing::info!("agent initialized");
                    Ok(agent)
                }
            }),
        }
    }

    /// Create a dispatcher around an agent that is already constructed.
    pub fn with_agent(agent: A) -> Self {
        Self {
            gate: Gate::ready(agent),
        }
    }

    /// Whether the agent has been constructed.
    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    /// Construct the agent if needed and return it.
    pub async fn ensure_ready(&self) -> std::result::Result<Arc<A>, InitError> {
        self.gate.get_or_init().await
    }

    /// Handle a conversation: ensure the agent exists, then run it.
    pub async fn handle(&self, conversation: Conversation) -> Result<A::Response> {
        let agent = self.ensure_ready().await?;
        forward(&*agent, conversation).await
    }

    /// Forward a conversation to the constructed agent.
    ///
    /// Does not initialize; fails with [`Error::NotInitialized`] when no
    /// agent has been constructed yet.
    pub async fn send(&self, conversation: Conversation) -> Result<A::Response> {
        let agent = self.gate.get().ok_or(Error::NotInitialized)?;
        forward(&*agent, conversation).await
    }

    /// Shut down the agent if one was constructed. Idempotent.
    pub async fn cleanup(&self) {
        tracing::info!("cleaning up agent resources");
        if let Some(agent) = self.gate.get() {
            agent.cleanup().await;
        }
    }
}

async fn forward<A: Agent>(agent: &A, conversation: Conversation) -> Result<A::Response> {
    tracing::debug!("forwarding conversation of {} messages", conversation.len());
    agent.run(conversation).await.map_err(Error::Agent)
}

impl<A: Agent> std::fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("gate", &self.gate)
            .finish()
    }
}
