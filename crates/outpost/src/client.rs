//! Agent lifecycle and poll loop

use crate::error::AgentError;
use crate::protocol::Protocol;
use crate::task::Task;
use crate::transport::Transport;
use crate::Result;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};
use uuid::Uuid;

/// Agent configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Interval between poll cycles
    ///
    /// A zero interval means "poll again as soon as the scheduler allows";
    /// the loop still yields between cycles so [`Agent::stop`] can take
    /// effect.
    pub pull_interval: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            pull_interval: Duration::from_secs(1),
        }
    }
}

/// Polling task-execution client
///
/// The agent owns its lifecycle state (`Stopped`/`Started`) and drives the
/// poll loop: on every timer fire it fetches pending tasks from the
/// transport, dispatches them in order against the command protocol, reports
/// handler results back, and re-arms the timer. Every failure inside a cycle
/// is isolated and logged; nothing short of construction-time contract
/// violations is fatal.
///
/// `Agent` is a cheap-clone handle; all clones share one lifecycle. Dropping
/// every handle stops the loop, since the pending timer holds only a weak
/// reference.
#[derive(Clone)]
pub struct Agent {
    /// Shared agent state
    inner: Arc<Inner>,
}

impl Agent {
    /// Create a new agent from a command protocol and a transport
    ///
    /// Fails with [`AgentError::EmptyProtocol`] if the protocol has no
    /// registered commands; this contract is checked at construction, not
    /// deferred to the first poll.
    pub fn new(
        protocol: Protocol,
        transport: Arc<dyn Transport>,
        config: AgentConfig,
    ) -> Result<Self> {
        if protocol.is_empty() {
            return Err(AgentError::EmptyProtocol);
        }

        let inner = Arc::new_cyclic(|weak: &Weak<Inner>| Inner {
            id: Uuid::new_v4(),
            protocol,
            transport,
            pull_interval: config.pull_interval,
            state: Mutex::new(Lifecycle::default()),
            api: HandlerApi {
                inner: weak.clone(),
            },
        });

        Ok(Self { inner })
    }

    /// Get the agent instance id
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Check whether the agent is currently started
    pub fn is_started(&self) -> bool {
        self.inner.lock_state().started
    }

    /// Start polling
    ///
    /// Arms the first poll for `pull_interval` from now and returns
    /// immediately. Calling `start` on an already started agent is a no-op.
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) {
        Inner::start(&self.inner);
    }

    /// Stop polling
    ///
    /// Cancels the pending poll, if any, and returns immediately. A cycle
    /// already in flight completes but does not reschedule. Calling `stop`
    /// on an already stopped agent is a no-op.
    pub fn stop(&self) {
        self.inner.stop();
    }
}

/// Lifecycle state: the started flag and the single pending-timer handle
///
/// Invariant: the timer exists iff the agent is started and no cycle is
/// currently executing. Both fields are mutated only inside short
/// lock-guarded sections that never cross an await.
#[derive(Default)]
struct Lifecycle {
    started: bool,
    timer: Option<JoinHandle<()>>,
}

/// Shared agent state behind the cheap-clone handle
struct Inner {
    /// Instance id stamped into log records
    id: Uuid,
    /// Command protocol supplied by the embedding application
    protocol: Protocol,
    /// Transport toward the coordinator
    transport: Arc<dyn Transport>,
    /// Interval between poll cycles
    pull_interval: Duration,
    /// Lifecycle state
    state: Mutex<Lifecycle>,
    /// The one capability object handed to every handler invocation
    api: HandlerApi,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, Lifecycle> {
        self.state.lock().expect("agent state lock poisoned")
    }

    fn start(this: &Arc<Inner>) {
        let mut state = this.lock_state();
        if state.started {
            return;
        }
        info!("agent {} starting", this.id);
        state.started = true;
        state.timer = Some(Inner::arm(this));
    }

    fn stop(&self) {
        let mut state = self.lock_state();
        if !state.started {
            return;
        }
        info!("agent {} stopping", self.id);
        state.started = false;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    /// Arm the timer for the next poll cycle
    ///
    /// The spawned task holds only a weak reference, so dropping every
    /// `Agent` handle lets the loop wind down on its own.
    fn arm(this: &Arc<Inner>) -> JoinHandle<()> {
        let weak = Arc::downgrade(this);
        let interval = this.pull_interval;
        tokio::spawn(async move {
            sleep(interval).await;
            if let Some(inner) = weak.upgrade() {
                inner.pull().await;
            }
        })
    }

    /// One poll cycle: fetch, dispatch all tasks in order, reschedule
    async fn pull(self: Arc<Self>) {
        {
            let mut state = self.lock_state();
            // The timer that drove us here has fired; release its handle
            // before any work so stop() cannot abort a cycle in flight.
            state.timer = None;
            if !state.started {
                return;
            }
        }

        debug!("agent {} polling for tasks", self.id);
        match self.transport.fetch_tasks().await {
            Ok(tasks) => {
                debug!("agent {} fetched {} task(s)", self.id, tasks.len());
                for task in tasks {
                    if let Err(err) = self.dispatch(task).await {
                        info!("agent {}: task execution failed (ignored): {}", self.id, err);
                    }
                }
            }
            Err(err) => {
                info!("agent {}: task fetch failed (ignored): {}", self.id, err);
            }
        }

        // Reschedule regardless of how the cycle went, unless stop() arrived
        // in the meantime. A handler may have called stop() and then start(),
        // which already armed a fresh timer; never let two coexist.
        let mut state = self.lock_state();
        if state.started && state.timer.is_none() {
            state.timer = Some(Inner::arm(&self));
        }
    }

    /// Dispatch a single task, reporting its result if one is produced
    async fn dispatch(&self, task: Task) -> Result<()> {
        let Task { id, command, args } = task;

        let handler = self
            .protocol
            .get(&command)
            .ok_or_else(|| AgentError::UnknownCommand(command.clone()))?;

        debug!("agent {}: dispatching task {} to \"{}\"", self.id, id, command);
        let result = handler
            .handle(args, &self.api)
            .await
            .map_err(|error| AgentError::Handler {
                command: command.clone(),
                error,
            })?;

        if let Some(value) = result {
            if let Err(err) = self.transport.report_result(id, &command, value).await {
                info!(
                    "agent {}: result report for task {} failed (ignored): {}",
                    self.id, id, err
                );
            }
        }

        Ok(())
    }
}

/// Restricted capability object passed to every handler invocation
///
/// This is the only way a handler may affect the agent lifecycle or push
/// out-of-band data; it exposes nothing else of the agent or the transport.
/// One `HandlerApi` is constructed per agent and handed to handlers by
/// reference, so its identity is stable for the agent's lifetime.
pub struct HandlerApi {
    /// Weak back-reference into the agent state
    inner: Weak<Inner>,
}

impl HandlerApi {
    /// Stop the agent
    pub fn stop(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.stop();
        }
    }

    /// Start the agent
    pub fn start(&self) {
        if let Some(inner) = self.inner.upgrade() {
            Inner::start(&inner);
        }
    }

    /// Push an out-of-band payload on a named channel
    ///
    /// Failures are logged and swallowed, matching the transport's
    /// fire-and-forget reporting policy.
    pub async fn send(&self, channel: &str, data: Value) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        if let Err(err) = inner.transport.send_data(channel, data).await {
            info!(
                "agent {}: out-of-band send on \"{}\" failed (ignored): {}",
                inner.id, channel, err
            );
        }
    }

    /// Detached capability for handler tests; every operation is a no-op
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self { inner: Weak::new() }
    }
}
