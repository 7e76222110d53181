//! Wire-level chat messages.

use crate::{Message, Role, model::ToolCall};
use serde::{Deserialize, Serialize};

/// The role of a wire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The system role
    System,
    /// The user role
    #[default]
    User,
    /// The assistant role
    Assistant,
    /// The tool role
    Tool,
}

impl From<Role> for ChatRole {
    fn from(role: Role) -> Self {
        match role {
            Role::System => Self::System,
            Role::User => Self::User,
            Role::Assistant => Self::Assistant,
        }
    }
}

/// A message as sent to and received from the model.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChatMessage {
    /// The role of the message
    pub role: ChatRole,

    /// The content of the message
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,

    /// The tool call this message answers
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tool_call_id: String,

    /// The tool calls requested by the assistant
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            tool_calls,
            ..Default::default()
        }
    }

    /// Create a new tool result message
    pub fn tool(content: impl Into<String>, call: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tool,
            content: content.into(),
            tool_call_id: call.into(),
            ..Default::default()
        }
    }
}

impl From<Message> for ChatMessage {
    fn from(message: Message) -> Self {
        Self {
            role: message.role.into(),
            content: message.content,
            ..Default::default()
        }
    }
}

/// Providers send `"content": null` on pure tool-call turns.
fn nullable<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
