//! Tools the agent may call, keyed by name.

use rcore::{
    Capabilities, Capability,
    model::{ChatMessage, Tool, ToolCall},
};
use std::{collections::BTreeMap, future::Future, pin::Pin, sync::Arc};

pub use exa::{EXA_ENDPOINT, Exa, SearchResult};
pub use mem0::{MEM0_ENDPOINT, Mem0};

mod exa;
mod mem0;

/// A type-erased async tool handler.
///
/// Receives the raw JSON arguments and returns the text handed back to
/// the model. Failures are reported in that text, never raised.
pub type Handler =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = String> + Send>> + Send + Sync>;

struct Entry {
    tool: Tool,
    capability: Capability,
    handler: Handler,
}

/// The tools attached to an agent.
#[derive(Default)]
pub struct ToolSet {
    entries: BTreeMap<String, Entry>,
}

impl ToolSet {
    /// Create an empty tool set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with its handler under `capability`.
    ///
    /// Registering a name twice replaces the earlier tool.
    pub fn register<F, Fut>(&mut self, capability: Capability, tool: Tool, handler: F)
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = String> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |args| Box::pin(handler(args)));
        self.entries.insert(
            tool.name.clone(),
            Entry {
                tool,
                capability,
                handler,
            },
        );
    }

    /// Tool schemas to offer the model.
    pub fn schemas(&self) -> Vec<Tool> {
        self.entries.values().map(|entry| entry.tool.clone()).collect()
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The capabilities backed by at least one registered tool.
    pub fn capabilities(&self) -> Capabilities {
        self.entries
            .values()
            .fold(Capabilities::none(), |caps, entry| {
                caps.with(entry.capability, true)
            })
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tool is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every call in order and collect the tool result messages.
    pub async fn dispatch(&self, calls: &[ToolCall]) -> Vec<ChatMessage> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let name = call.function.name.as_str();
            let output = if let Some(entry) = self.entries.get(name) {
                tracing::debug!("calling tool {name}");
                (entry.handler)(call.function.arguments.clone()).await
            } else {
                tracing::warn!("model called unknown tool {name}");
                format!("function {name} not available")
            };
            results.push(ChatMessage::tool(output, call.id.clone()));
        }
        results
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}
