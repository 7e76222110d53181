//! Core abstractions for the reel agent service.
//!
//! A [`Dispatcher`] owns a [`Gate`] that constructs the agent exactly once,
//! then forwards every [`Conversation`] to it. The [`model`] module holds
//! the OpenAI-compatible wire types shared by model clients and tools.

pub use {
    capability::{Capabilities, Capability},
    dispatch::{Agent, Dispatcher},
    error::{CredentialError, Error, InitError},
    gate::Gate,
    message::{Conversation, Message, Role},
};

mod capability;
mod dispatch;
mod error;
mod gate;
mod message;
pub mod model;
