//! OpenAI-compatible chat completion types and the model client trait.
//!
//! These are the wire types exchanged with the model provider. They are
//! richer than [`Conversation`](crate::Conversation): assistant turns may
//! carry tool calls and tool results come back under the `tool` role.

use anyhow::Result;
use std::future::Future;

pub use message::{ChatMessage, ChatRole};
pub use request::Request;
pub use response::{Choice, FinishReason, Response, Usage};
pub use tool::{FunctionCall, Tool, ToolCall, ToolChoice};

mod message;
mod request;
mod response;
mod tool;

/// A chat completion client.
///
/// Constructors are inherent methods on each client; the trait only covers
/// the call itself so agents can be tested against a scripted model.
pub trait Model: Send + Sync + 'static {
    /// Send a chat completion request.
    fn send(&self, request: &Request) -> impl Future<Output = Result<Response>> + Send;
}
