//! Dispatch host exposing observable command state.
//!
//! Holds the workspace selection and publishes the latest response through a
//! single-slot watch cell. Concurrent `send_command` calls are allowed and are
//! not serialized: the published response is whichever call finished last.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use krake_core::config::DispatchConfig;
use krake_core::types::{Timestamp, Workspace};
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::CommandError;
use crate::interpreter::Interpreter;
use crate::types::{CommandHistoryEntry, CommandRequest, CommandResponse};

/// Decrements the in-flight counter when a send completes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns an [`Interpreter`] and the state the command bar observes.
pub struct DispatchHost {
    interpreter: Interpreter,
    workspace: Mutex<Option<Workspace>>,
    in_flight: AtomicUsize,
    last_response: watch::Sender<Option<CommandResponse>>,
    history: Mutex<VecDeque<CommandHistoryEntry>>,
    latency: Duration,
    history_limit: usize,
}

impl std::fmt::Debug for DispatchHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchHost")
            .field("workspace", &self.current_workspace())
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .field("latency", &self.latency)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

impl DispatchHost {
    /// Create a host with no workspace selected.
    pub fn new(interpreter: Interpreter, config: &DispatchConfig) -> Self {
        let (last_response, _) = watch::channel(None);
        Self {
            interpreter,
            workspace: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
            last_response,
            history: Mutex::new(VecDeque::new()),
            latency: Duration::from_millis(config.latency_ms),
            history_limit: config.history_limit.max(1),
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Replace the current workspace.
    pub fn select_workspace(&self, workspace: Workspace) {
        tracing::info!(workspace = %workspace.name, "Workspace selected");
        *lock(&self.workspace) = Some(workspace);
    }

    pub fn clear_workspace(&self) {
        *lock(&self.workspace) = None;
    }

    pub fn current_workspace(&self) -> Option<Workspace> {
        lock(&self.workspace).clone()
    }

    /// Whether at least one `send_command` is waiting to publish.
    pub fn is_processing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// The most recently published response, if any.
    pub fn last_response(&self) -> Option<CommandResponse> {
        self.last_response.borrow().clone()
    }

    /// Observe published responses. Receivers only ever see the latest value.
    pub fn subscribe(&self) -> watch::Receiver<Option<CommandResponse>> {
        self.last_response.subscribe()
    }

    /// Processed commands, oldest first.
    pub fn history(&self) -> Vec<CommandHistoryEntry> {
        lock(&self.history).iter().cloned().collect()
    }

    /// Interpret `text` against the current workspace, wait out the configured
    /// latency, then publish and return the response.
    ///
    /// Fails immediately, without publishing, when no workspace is selected.
    pub async fn send_command(&self, text: &str) -> Result<CommandResponse, CommandError> {
        let request = CommandRequest {
            text: text.to_string(),
            workspace: self.current_workspace(),
        };

        let response = match self.interpreter.interpret(&request) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Command rejected");
                return Err(e);
            }
        };

        {
            let _guard = InFlight::enter(&self.in_flight);
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            self.last_response.send_replace(Some(response.clone()));
        }

        if let Some(workspace) = &request.workspace {
            self.record(workspace, text, &response);
        }

        tracing::info!(
            reply = %response.reply,
            actions = response.actions.len(),
            "Command processed"
        );
        Ok(response)
    }

    fn record(&self, workspace: &Workspace, text: &str, response: &CommandResponse) {
        let mut history = lock(&self.history);
        if history.len() >= self.history_limit {
            history.pop_front();
        }
        history.push_back(CommandHistoryEntry {
            id: Uuid::new_v4(),
            workspace_id: workspace.id,
            command: text.to_string(),
            reply: response.reply.clone(),
            created_at: Timestamp::now(),
        });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
