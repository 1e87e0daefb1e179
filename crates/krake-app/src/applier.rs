//! Terminal host for interpreted actions.
//!
//! There is no UI to drive here, so each action is recorded with `tracing`
//! and counted. Integrations the terminal host has been told to refuse are
//! reported as unsupported.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use krake_command::{Action, ActionApplier, ApplyError, Integration};
use krake_core::Workspace;

#[derive(Debug, Default)]
pub struct LoggingApplier {
    disabled: HashSet<Integration>,
    applied: AtomicUsize,
}

impl LoggingApplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse `open_integration` actions for these integrations.
    pub fn with_disabled(disabled: impl IntoIterator<Item = Integration>) -> Self {
        Self {
            disabled: disabled.into_iter().collect(),
            applied: AtomicUsize::new(0),
        }
    }

    pub fn applied_count(&self) -> usize {
        self.applied.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ActionApplier for LoggingApplier {
    async fn apply(&self, action: &Action, workspace: &Workspace) -> Result<(), ApplyError> {
        if let Action::OpenIntegration { integration } = action {
            if self.disabled.contains(integration) {
                return Err(ApplyError::Unsupported(action.kind()));
            }
        }

        match action {
            Action::CreateTask { task_id, title } => {
                tracing::info!(workspace = %workspace.name, %task_id, %title, "Task created");
            }
            Action::OpenIntegration { integration } => {
                tracing::info!(workspace = %workspace.name, %integration, "Integration opened");
            }
            Action::OpenAgents => {
                tracing::info!(workspace = %workspace.name, "Agents opened");
            }
            other => {
                tracing::info!(
                    workspace = %workspace.name,
                    kind = %other.kind(),
                    action = ?other,
                    "Service call dispatched"
                );
            }
        }
        self.applied.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
