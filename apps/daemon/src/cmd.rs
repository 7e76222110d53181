//! Command line interface and the serve loop.

use crate::{
    banner,
    config::{self, AgentConfig},
    server,
};
use anyhow::Result;
use clap::Parser;
use rcore::Dispatcher;
use runtime::Overrides;
use std::{path::PathBuf, sync::Arc};

/// Movie recommender agent daemon.
#[derive(Parser, Debug, Clone)]
#[command(name = "reeld", about = "Movie recommender agent over HTTP", version)]
pub struct Cli {
    /// OpenRouter API key.
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub openrouter_api_key: Option<String>,

    /// Exa API key for movie information search.
    #[arg(long, env = "EXA_API_KEY", hide_env_values = true)]
    pub exa_api_key: Option<String>,

    /// Mem0 API key for conversation memory.
    #[arg(long, env = "MEM0_API_KEY", hide_env_values = true)]
    pub mem0_api_key: Option<String>,

    /// Model id on OpenRouter.
    #[arg(long, env = "MODEL_NAME")]
    pub model: Option<String>,

    /// Path to agent_config.json.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to listen on; defaults to the host and port of the
    /// deployment url.
    #[arg(long)]
    pub bind: Option<String>,
}

impl Cli {
    /// Credentials and model passed on the command line.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            openrouter_api_key: self.openrouter_api_key.clone(),
            exa_api_key: self.exa_api_key.clone(),
            mem0_api_key: self.mem0_api_key.clone(),
            model: self.model.clone(),
        }
    }

    /// Load the agent config from the search paths.
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig::discover(&config::search_paths(self.config.as_deref()))
    }

    /// The address to listen on.
    pub fn bind_address(&self, config: &AgentConfig) -> String {
        self.bind.clone().unwrap_or_else(|| config.bind_address())
    }

    /// Serve until ctrl-c, then release agent resources.
    ///
    /// The agent is built on the first request, so missing credentials
    /// surface as request errors rather than startup failures.
    pub async fn run(self) -> Result<()> {
        let config = self.agent_config();
        println!("{}", banner::render(&self, &config.deployment.url));

        let overrides = self.overrides();
        let dispatcher = Arc::new(Dispatcher::new(move || {
            runtime::initialize(overrides.clone())
        }));

        let bind = self.bind_address(&config);
        let served: Result<()> = async {
            let handle = server::serve(Arc::clone(&dispatcher), &config, &bind).await?;
            tokio::signal::ctrl_c().await?;
            handle.shutdown().await
        }
        .await;

        dispatcher.cleanup().await;
        match &served {
            Ok(()) => tracing::info!("{} stopped", config.name),
            Err(e) => tracing::error!("{} failed: {e:#}", config.name),
        }
        served
    }
}
