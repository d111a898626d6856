//! Baseline command handlers every deployment carries

use anyhow::Result;
use async_trait::async_trait;
use outpost::{CommandHandler, HandlerApi};
use serde_json::{json, Value};
use std::time::Instant;

/// Handler for the `info` command: a diagnostic report about the running process
pub struct InfoHandler {
    /// Process start reference for uptime reporting
    started: Instant,
}

impl InfoHandler {
    /// Create a handler anchored at the current instant
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for InfoHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for InfoHandler {
    async fn handle(&self, _args: Value, _api: &HandlerApi) -> Result<Option<Value>> {
        let report = json!({
            "pid": std::process::id(),
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "version": env!("CARGO_PKG_VERSION"),
            "uptime_secs": self.started.elapsed().as_secs(),
        });
        Ok(Some(report))
    }
}

/// Handler for the `stop` command: stops the agent and acknowledges
pub struct StopHandler;

#[async_trait]
impl CommandHandler for StopHandler {
    async fn handle(&self, _args: Value, api: &HandlerApi) -> Result<Option<Value>> {
        api.stop();
        Ok(Some(json!("ok")))
    }
}
