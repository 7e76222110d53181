//! Agent construction from settings.

use crate::{
    OpenRouter, Overrides, Persona, ReelAgent, Settings, ToolSet,
    tools::{Exa, Mem0},
};
use rcore::InitError;
use reqwest::Client;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Resolve settings from `overrides` and the environment, then build the
/// agent.
///
/// Intended as the dispatcher's initializer: nothing is read from the
/// environment until the first request arrives.
pub async fn initialize(overrides: Overrides) -> Result<ReelAgent<OpenRouter>, InitError> {
    let settings = Settings::from_env(&overrides)?;
    build_agent(&settings)
}

/// Build the agent from resolved settings.
///
/// Search is always attached; memory only when a Mem0 key is configured.
pub fn build_agent(settings: &Settings) -> Result<ReelAgent<OpenRouter>, InitError> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(InitError::setup)?;

    let model =
        OpenRouter::new(client.clone(), &settings.openrouter_api_key).map_err(InitError::setup)?;

    let mut tools = ToolSet::new();
    Exa::new(client.clone(), &settings.exa_api_key)
        .map_err(InitError::setup)?
        .register(&mut tools);
    if let Some(key) = &settings.mem0_api_key {
        Mem0::new(client, key, settings.memory_user.as_str())
            .map_err(InitError::setup)?
            .register(&mut tools);
    }

    let agent = ReelAgent::new(Persona::default(), model, settings.model.as_str(), tools);
    let enabled = agent
        .capabilities()
        .enabled()
        .map(|capability| capability.as_str())
        .collect::<Vec<_>>();
    tracing::info!(
        "agent '{}' ready on {} with {}",
        agent.persona().name,
        agent.model_name(),
        enabled.join(", ")
    );
    if settings.mem0_api_key.is_none() {
        tracing::info!("memory disabled, set MEM0_API_KEY to enable it");
    }
    Ok(agent)
}
