//! Conversation messages accepted by the dispatcher.

use serde::{Deserialize, Serialize};
use std::slice::Iter;

/// The role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the agent.
    System,
    /// A message from the user.
    User,
    /// A previous reply from the agent.
    Assistant,
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Message {
    /// The role of the author.
    pub role: Role,

    /// The text content.
    pub content: String,
}

impl Message {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An ordered chat history.
///
/// Serialized as a plain JSON array of messages. The dispatcher takes it by
/// value, so a conversation cannot change once it has been handed over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Conversation(Vec<Message>);

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(mut self, message: Message) -> Self {
        self.0.push(message);
        self
    }

    /// The messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    /// Iterate over the messages in order.
    pub fn iter(&self) -> Iter<'_, Message> {
        self.0.iter()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the conversation has no messages.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most recent user message, if any.
    pub fn last_user(&self) -> Option<&Message> {
        self.0.iter().rev().find(|m| m.role == Role::User)
    }

    /// Consume the conversation into its messages.
    pub fn into_messages(self) -> Vec<Message> {
        self.0
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self(messages)
    }
}

impl FromIterator<Message> for Conversation {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
