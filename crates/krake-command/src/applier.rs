//! Seam between interpreted actions and the host that carries them out.
//!
//! The interpreter only describes effects. A host implements
//! [`ActionApplier`] to open panels, insert tasks and so on.

use async_trait::async_trait;
use krake_core::types::Workspace;

use crate::error::ApplyError;
use crate::types::{Action, CommandResponse};

/// Carries out a single action against the host UI or state.
#[async_trait]
pub trait ActionApplier: Send + Sync {
    /// Apply `action` in the context of `workspace`.
    async fn apply(&self, action: &Action, workspace: &Workspace) -> Result<(), ApplyError>;
}

/// Apply every action of `response` in order, stopping at the first failure.
///
/// Returns the number of actions applied.
pub async fn apply_all(
    applier: &dyn ActionApplier,
    response: &CommandResponse,
    workspace: &Workspace,
) -> Result<usize, ApplyError> {
    for (index, action) in response.actions.iter().enumerate() {
        if let Err(e) = applier.apply(action, workspace).await {
            tracing::warn!(
                index,
                kind = %action.kind(),
                error = %e,
                "Stopped applying actions"
            );
            return Err(e);
        }
    }
    Ok(response.actions.len())
}
