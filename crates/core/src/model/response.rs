//! Chat completion response.

use crate::model::ChatMessage;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// A chat completion response from the model
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// A unique identifier for the completion
    #[serde(default)]
    pub id: String,

    /// The model that served the completion
    #[serde(default)]
    pub model: String,

    /// The list of completion choices
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token usage statistics
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl Response {
    /// The first choice's message.
    pub fn message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|choice| &choice.message)
    }

    /// Get the reason the model stopped generating
    pub fn reason(&self) -> Option<FinishReason> {
        self.choices.first().and_then(|choice| choice.finish_reason)
    }
}

/// A completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The index of this choice in the list
    #[serde(default)]
    pub index: u32,

    /// The generated message
    pub message: ChatMessage,

    /// The reason the model stopped generating
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// The reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model finished naturally
    Stop,
    /// The model hit the max token limit
    Length,
    /// Content was filtered
    ContentFilter,
    /// The model is making tool calls
    ToolCalls,
    /// Anything else a provider reports
    #[serde(other)]
    Other,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Usage {
    /// Number of tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Number of tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total number of tokens used
    #[serde(default)]
    pub total_tokens: u32,
}

impl AddAssign for Usage {
    fn add_assign(&mut self, other: Self) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}
