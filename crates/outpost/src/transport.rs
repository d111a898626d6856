//! Transport abstraction toward the coordinator

use crate::error::TransportError;
use crate::task::Task;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Transport abstraction for talking to the coordinator
///
/// The agent core depends only on this three-operation contract; how tasks
/// actually travel over the wire (serialization, authentication, framing) is
/// owned by the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the pending tasks for this agent
    ///
    /// May return an empty batch. Any failure is treated by the agent as
    /// "no tasks this cycle", never as fatal.
    async fn fetch_tasks(&self) -> Result<Vec<Task>, TransportError>;

    /// Report a completed task's result to the coordinator
    ///
    /// Fire-and-forget from the agent's perspective: failures are logged by
    /// the caller, never re-raised and never retried within the same cycle.
    async fn report_result(
        &self,
        task_id: u64,
        command: &str,
        result: Value,
    ) -> Result<(), TransportError>;

    /// Push an arbitrary payload on a named channel, independent of any task
    ///
    /// Same failure policy as [`report_result`](Transport::report_result).
    async fn send_data(&self, channel: &str, data: Value) -> Result<(), TransportError>;
}

/// Construction parameters for coordinator transports
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Shared secret used to authenticate against the coordinator
    ///
    /// The default is a fixed placeholder and must be overridden in production.
    pub secret: String,
    /// Coordinator address
    pub server: String,
    /// Coordinator port
    pub port: u16,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            secret: "unsecure".to_string(),
            server: "127.0.0.1".to_string(),
            port: 41234,
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Placeholder transport that fails every operation
///
/// Stands in until a real coordinator transport exists: every operation
/// returns [`TransportError::Unimplemented`] rather than silently succeeding,
/// so the agent's error-isolation paths stay exercisable.
pub struct StubTransport {
    /// Transport configuration
    config: TransportConfig,
}

impl StubTransport {
    /// Create a stub transport with the given configuration
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Get the transport configuration
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, TransportError> {
        debug!(
            "stub transport: refusing fetch from {}:{}",
            self.config.server, self.config.port
        );
        Err(TransportError::Unimplemented("fetch_tasks"))
    }

    async fn report_result(
        &self,
        _task_id: u64,
        _command: &str,
        _result: Value,
    ) -> Result<(), TransportError> {
        Err(TransportError::Unimplemented("report_result"))
    }

    async fn send_data(&self, _channel: &str, _data: Value) -> Result<(), TransportError> {
        Err(TransportError::Unimplemented("send_data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_config_defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.secret, "unsecure");
        assert_eq!(config.server, "127.0.0.1");
        assert_eq!(config.port, 41234);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_stub_transport_keeps_config() {
        let config = TransportConfig {
            server: "coordinator.example.com".to_string(),
            port: 9000,
            ..Default::default()
        };
        let transport = StubTransport::new(config);

        assert_eq!(transport.config().server, "coordinator.example.com");
        assert_eq!(transport.config().port, 9000);
    }

    #[tokio::test]
    async fn test_stub_transport_fails_every_operation() {
        let transport = StubTransport::new(TransportConfig::default());

        assert!(matches!(
            transport.fetch_tasks().await,
            Err(TransportError::Unimplemented("fetch_tasks"))
        ));
        assert!(matches!(
            transport.report_result(1, "info", Value::Null).await,
            Err(TransportError::Unimplemented("report_result"))
        ));
        assert!(matches!(
            transport.send_data("telemetry", Value::Null).await,
            Err(TransportError::Unimplemented("send_data"))
        ));
    }
}
