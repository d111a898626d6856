//! Outpost Agent Binary
//!
//! Long-running client that polls the coordinator for tasks and executes
//! them against the registered command protocol.

use anyhow::Result;
use outpost::{Agent, AgentConfig, Protocol, StubTransport};
use std::sync::Arc;
use tracing::info;

mod config;
mod handlers;

use config::Settings;
use handlers::{InfoHandler, StopHandler};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Unhandled panics surface as log records instead of silent crashes
    std::panic::set_hook(Box::new(|panic| {
        info!("unhandled panic (ignored): {}", panic);
    }));

    let settings = Settings::from_env();
    info!(
        "starting outpost agent for coordinator {}:{}",
        settings.server, settings.port
    );

    let mut protocol = Protocol::new();
    protocol.register("info", Arc::new(InfoHandler::new()));
    protocol.register("stop", Arc::new(StopHandler));

    let transport = Arc::new(StubTransport::new(settings.transport_config()));
    let agent = Agent::new(
        protocol,
        transport,
        AgentConfig {
            pull_interval: settings.pull_interval,
        },
    )?;

    agent.start();

    tokio::signal::ctrl_c().await?;
    agent.stop();
    info!("outpost agent shut down");
    Ok(())
}
