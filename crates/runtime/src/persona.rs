//! Agent persona: name and system prompt.

use rcore::model::ChatMessage;

/// Default system prompt of the movie recommender.
pub const DEFAULT_PROMPT: &str = include_str!("../prompts/persona.md");

/// Default display name of the agent.
pub const DEFAULT_NAME: &str = "PopcornPal - Movie Recommender";

/// Who the agent is and how it is instructed.
#[derive(Debug, Clone)]
pub struct Persona {
    /// Display name, reported with every run.
    pub name: String,
    /// Base system prompt.
    pub system_prompt: String,
    /// Append the current date and time to the system prompt.
    pub add_datetime: bool,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.into(),
            system_prompt: DEFAULT_PROMPT.into(),
            add_datetime: true,
        }
    }
}

impl Persona {
    /// Create a persona with the given name and prompt.
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            add_datetime: false,
        }
    }

    /// Set whether the current date and time is added to the prompt.
    pub fn with_datetime(mut self, add_datetime: bool) -> Self {
        self.add_datetime = add_datetime;
        self
    }

    /// The system message for one run.
    pub fn system_message(&self) -> ChatMessage {
        if !self.add_datetime {
            return ChatMessage::system(&self.system_prompt);
        }
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S %Z");
        ChatMessage::system(format!(
            "{}\n\nThe current date and time is {now}.",
            self.system_prompt.trim_end()
        ))
    }
}
