mod admin;
mod api;
mod commands;
mod config;
mod errors;
mod forms;
mod guards;
mod insights;
mod listing;
mod llm_client;
mod models;
mod session;
mod state;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api::ApiClient;
use crate::commands::Cli;
use crate::config::Config;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::session::{FileTokenStore, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let api = ApiClient::new(config.api_base_url.clone())?;
    let storage = Arc::new(FileTokenStore::new(config.token_file.clone()));
    debug!(
        "jobboard v{} against {} (token file {})",
        env!("CARGO_PKG_VERSION"),
        api.base_url(),
        storage.path().display()
    );
    let session = Arc::new(SessionStore::new(Arc::new(api.clone()), storage));
    crate::session::log_transitions(session.subscribe());

    let llm: Option<Arc<dyn TextGenerator>> = match &config.anthropic_api_key {
        Some(key) => {
            let client: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(
                key.clone(),
                config.anthropic_api_url.clone(),
            )?);
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => None,
    };

    let restored = session.initialize().await;
    debug!("Session restored: {}", restored.is_authenticated());

    let state = AppState {
        api,
        session,
        llm,
        config,
    };

    commands::run(cli, &state).await?;
    Ok(())
}
