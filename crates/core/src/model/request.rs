//! Chat completion request.

use crate::model::{ChatMessage, Tool, ToolChoice};
use serde::Serialize;

/// A chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The model to use.
    pub model: String,

    /// The conversation messages.
    pub messages: Vec<ChatMessage>,

    /// The tools available for this request.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,

    /// Controls which tool is called by the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl Request {
    /// Create a new request for the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            tools: Vec::new(),
            tool_choice: None,
        }
    }

    /// Set the messages for this request.
    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    /// Set the tools for this request. Tool choice follows: `auto` when any
    /// tool is offered, omitted otherwise.
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tool_choice = (!tools.is_empty()).then_some(ToolChoice::Auto);
        self.tools = tools;
        self
    }
}
