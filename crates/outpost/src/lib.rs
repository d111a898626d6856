//! # Outpost
//!
//! A Rust library for building polling remote-task-execution agents.
//!
//! Outpost provides a client that periodically fetches tasks from a remote
//! coordinator over a pluggable transport, dispatches each task to a command
//! handler registered by the embedding application, and reports results back.
//! Failures inside a poll cycle are isolated and logged; only construction-time
//! contract violations are fatal.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Error types for the Outpost library
pub mod error;

/// Task data model
pub mod task;

/// Command protocol and handler registration
pub mod protocol;

/// Transport contract toward the coordinator
pub mod transport;

/// Agent lifecycle and poll loop
pub mod client;

pub use client::{Agent, AgentConfig, HandlerApi};
pub use error::{AgentError, TransportError};
pub use protocol::{CommandHandler, Protocol};
pub use task::Task;
pub use transport::{StubTransport, Transport, TransportConfig};

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;
