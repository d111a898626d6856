//! Task data model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unit of work fetched from the coordinator
///
/// Tasks are created by the [`Transport`](crate::Transport) on fetch and
/// consumed exactly once by dispatch. They have no lifecycle beyond a single
/// poll cycle: a task whose dispatch fails is logged and dropped, never
/// retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Identifier used to correlate the result back to the coordinator
    pub id: u64,
    /// Command name resolved against the protocol
    pub command: String,
    /// Opaque arguments passed to the handler; structure is defined by the command
    pub args: Value,
}

impl Task {
    /// Create a new task
    pub fn new(id: u64, command: impl Into<String>, args: Value) -> Self {
        Self {
            id,
            command: command.into(),
            args,
        }
    }
}
