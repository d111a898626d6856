//! Error types for the Outpost library

use std::io;
use thiserror::Error;

/// Failures raised by a coordinator transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection error
    #[error("connection error: {0}")]
    Connection(String),

    /// Authentication against the coordinator failed
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Protocol-level error in the coordinator exchange
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Operation timed out
    #[error("operation timed out")]
    Timeout,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Operation is not implemented by this transport
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),
}

/// Main error type for agent operations
#[derive(Debug, Error)]
pub enum AgentError {
    /// Transport failure during a poll cycle
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Task referenced a command absent from the protocol
    #[error("unknown protocol command: \"{0}\"")]
    UnknownCommand(String),

    /// A command handler itself failed
    #[error("command \"{command}\" failed: {error}")]
    Handler {
        /// Command name of the failing task
        command: String,
        /// Failure reported by the handler
        error: anyhow::Error,
    },

    /// Agent constructed with an empty command protocol
    #[error("command protocol must register at least one command")]
    EmptyProtocol,
}
