//! reel runtime: everything behind the dispatcher.
//!
//! [`initialize`] resolves credentials, builds the [`OpenRouter`] model
//! client and the [`ToolSet`], and returns a ready [`ReelAgent`]. The
//! daemon hands it to [`rcore::Dispatcher::new`] so it runs on first use.
//!
//! # Example
//!
//! ```rust,ignore
//! use rcore::{Conversation, Dispatcher, Message};
//! use runtime::Overrides;
//!
//! let dispatcher = Dispatcher::new(|| runtime::initialize(Overrides::default()));
//! let output = dispatcher
//!     .handle(Conversation::new().push(Message::user("Something like Heat")))
//!     .await?;
//! println!("{}", output.content);
//! ```

pub use agent::{MAX_TOOL_CALLS, ReelAgent, RunOutput, RunStatus};
pub use builder::{build_agent, initialize};
pub use http::Http;
pub use openrouter::{OPENROUTER_ENDPOINT, OpenRouter};
pub use persona::Persona;
pub use settings::{DEFAULT_MODEL, Overrides, Settings};
pub use tools::{Handler, ToolSet};

mod agent;
mod builder;
mod http;
mod openrouter;
mod persona;
pub mod settings;
pub mod tools;
