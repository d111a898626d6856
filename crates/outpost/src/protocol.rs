//! Command protocol and handler registration

use crate::client::HandlerApi;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Handler trait for protocol commands
///
/// Handlers are registered under a command name and invoked with the task's
/// arguments plus the restricted [`HandlerApi`] capability. Returning
/// `Some(value)` causes the agent to report the value to the coordinator with
/// the originating task's id and command name; returning `None` makes the
/// command fire-and-forget.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Execute the command against the given arguments
    async fn handle(&self, args: Value, api: &HandlerApi) -> anyhow::Result<Option<Value>>;
}

/// Mapping from command name to handler, supplied by the embedding application
///
/// The agent only looks handlers up by name; it never mutates the mapping.
#[derive(Clone, Default)]
pub struct Protocol {
    /// Registered handlers by command name
    commands: HashMap<String, Arc<dyn CommandHandler>>,
}

impl Protocol {
    /// Create an empty protocol
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a handler under a command name
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        let name = name.into();
        debug!("registering protocol command \"{}\"", name);
        self.commands.insert(name, handler);
    }

    /// Look up the handler for a command name
    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.commands.get(name).cloned()
    }

    /// Check whether any command is registered
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Iterate over the registered command names
    pub fn command_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct NullHandler;

    #[async_trait]
    impl CommandHandler for NullHandler {
        async fn handle(&self, _args: Value, _api: &HandlerApi) -> anyhow::Result<Option<Value>> {
            Ok(None)
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut protocol = Protocol::new();
        protocol.register("noop", Arc::new(NullHandler));

        assert!(protocol.get("noop").is_some());
        assert_eq!(protocol.len(), 1);
        assert!(!protocol.is_empty());
    }

    #[test]
    fn test_missing_command_is_none() {
        let mut protocol = Protocol::new();
        protocol.register("noop", Arc::new(NullHandler));

        assert!(protocol.get("ghost").is_none());
    }

    #[test]
    fn test_empty_protocol() {
        let protocol = Protocol::new();
        assert!(protocol.is_empty());
        assert_eq!(protocol.len(), 0);
        assert_eq!(protocol.command_names().count(), 0);
    }

    #[test]
    fn test_reregistering_replaces_handler() {
        let mut protocol = Protocol::new();
        protocol.register("noop", Arc::new(NullHandler));
        protocol.register("noop", Arc::new(NullHandler));

        assert_eq!(protocol.len(), 1);
    }

    #[tokio::test]
    async fn test_handler_invocation_through_registry() {
        let mut protocol = Protocol::new();
        protocol.register("noop", Arc::new(NullHandler));

        let api = HandlerApi::detached();
        let handler = protocol.get("noop").unwrap();
        let result = handler.handle(json!({}), &api).await.unwrap();
        assert!(result.is_none());
    }
}
