//! Parkmyst host entry point.

use std::error::Error;
use std::sync::Arc;

use parkmyst_components::builtin_registry;
use parkmyst_core::clock::SystemClock;
use parkmyst_host::config::HostConfig;
use parkmyst_host::loader::load_graph;
use parkmyst_host::transport::{JsonLineNotifier, LineTransport, pump};
use parkmyst_runtime::{Game, GameRunner};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber. Stdout carries feed changes, so logs go
    // to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!("Starting Parkmyst host");

    // Read configuration from environment.
    let config = HostConfig::from_env()?;

    // Load the game.
    let graph = load_graph(&config.game_path).await?;
    let registry = builtin_registry()?;
    let notifier = Arc::new(JsonLineNotifier::new(std::io::stdout()));
    let game = Game::new(&registry, &graph, notifier, SystemClock::shared(), config.game)?;

    // Run it until stdin closes.
    let (task, handle) = GameRunner::spawn(game);
    let mut transport = LineTransport::new(BufReader::new(tokio::io::stdin()));
    let forwarded = pump(&mut transport, &handle).await?;
    tracing::info!(forwarded, "input closed, shutting down");

    handle.shutdown().await?;
    let game = task.await?;
    tracing::info!(stats = ?game.stats(), ended = game.is_ended(), "game finished");

    Ok(())
}
