mod app;

use crate::app::prompt::StdinPrompt;
use cyclesync_client::client::{ApiClient, ApiError};
use serde::Deserialize;
use std::io;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Error constructing the API client: {0}")]
    Client(#[from] ApiError),
    #[error("Terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    #[serde(default = "default_api_base_url")]
    api_base_url: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_owned()
}

fn install_tracing() {
    // Errors stand in for the browser's developer console; anything louder
    // would interleave with the rendered pages.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cyclesync_cli=error,cyclesync_client=error".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::prefixed("CYCLESYNC_").from_env().map_err(InitError::from)
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let api = ApiClient::new(&env.api_base_url)?;
    let mut ui = StdinPrompt;
    let mut out = io::stdout();

    app::run(&api, &mut ui, &mut out).await?;

    Ok(())
}
