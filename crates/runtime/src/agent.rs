//! The movie recommender agent.

use crate::{Persona, ToolSet};
use anyhow::{Result, bail};
use rcore::{
    Agent, Capabilities, Conversation, Role,
    model::{ChatMessage, Model, Request, Usage},
};
use serde::Serialize;
use ulid::Ulid;

/// Maximum tool-call rounds per run.
pub const MAX_TOOL_CALLS: usize = 16;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// The model produced a final answer.
    Completed,
    /// The model was still calling tools when the round limit was hit.
    Truncated,
}

/// The result of one agent run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    /// Unique id of this run.
    pub run_id: Ulid,
    /// Name of the agent that answered.
    pub agent: String,
    /// Model that served the run.
    pub model: String,
    /// How the run ended.
    pub status: RunStatus,
    /// The final answer.
    pub content: String,
    /// Tools called during the run, in order.
    pub tools: Vec<String>,
    /// Token usage summed over every model call.
    pub usage: Usage,
}

/// A persona bound to a model and its tools.
pub struct ReelAgent<M: Model> {
    persona: Persona,
    model: M,
    model_name: String,
    tools: ToolSet,
    capabilities: Capabilities,
}

impl<M: Model> ReelAgent<M> {
    /// Create an agent. Capabilities are derived from `tools`.
    pub fn new(persona: Persona, model: M, model_name: impl Into<String>, tools: ToolSet) -> Self {
        let capabilities = tools.capabilities();
        Self {
            persona,
            model,
            model_name: model_name.into(),
            tools,
            capabilities,
        }
    }

    /// The agent's persona.
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// The model id requests are sent with.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// The capabilities this agent was built with.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// The attached tools.
    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    fn messages(&self, conversation: Conversation) -> Vec<ChatMessage> {
        let has_system = conversation
            .messages()
            .first()
            .is_some_and(|message| message.role == Role::System);
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        if !has_system {
            messages.push(self.persona.system_message());
        }
        messages.extend(conversation.into_messages().into_iter().map(ChatMessage::from));
        messages
    }

    fn output(&self, status: RunStatus, content: String, tools: Vec<String>, usage: Usage) -> RunOutput {
        RunOutput {
            run_id: Ulid::new(),
            agent: self.persona.name.clone(),
            model: self.model_name.clone(),
            status,
            content,
            tools,
            usage,
        }
    }
}

impl<M: Model> Agent for ReelAgent<M> {
    type Response = RunOutput;

    async fn run(&self, conversation: Conversation) -> Result<RunOutput> {
        let mut messages = self.messages(conversation);
        let schemas = self.tools.schemas();
        let mut called = Vec::new();
        let mut usage = Usage::default();
        let mut last = String::new();

        let mut round = 0;
        loop {
            // The final round withholds tools so the model has to answer.
            let tools = if round < MAX_TOOL_CALLS {
                schemas.clone()
            } else {
                Vec::new()
            };
            let request = Request::new(&self.model_name)
                .with_messages(messages.clone())
                .with_tools(tools);
            let response = self.model.send(&request).await?;
            if let Some(used) = response.usage {
                usage += used;
            }
            let Some(message) = response.message().cloned() else {
                bail!("model returned no choices");
            };

            if message.tool_calls.is_empty() || round == MAX_TOOL_CALLS {
                let status = if message.tool_calls.is_empty() {
                    RunStatus::Completed
                } else {
                    tracing::warn!("tool call limit reached after {MAX_TOOL_CALLS} rounds");
                    RunStatus::Truncated
                };
                let content = if message.content.is_empty() {
                    last
                } else {
                    message.content
                };
                return Ok(self.output(status, content, called, usage));
            }

            called.extend(message.tool_calls.iter().map(|c| c.function.name.clone()));
            let results = self.tools.dispatch(&message.tool_calls).await;
            if !message.content.is_empty() {
                last.clone_from(&message.content);
            }
            messages.push(message);
            messages.extend(results);
            round += 1;
        }
    }
}

impl<M: Model> std::fmt::Debug for ReelAgent<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReelAgent")
            .field("name", &self.persona.name)
            .field("model", &self.model_name)
            .field("tools", &self.tools)
            .finish()
    }
}
