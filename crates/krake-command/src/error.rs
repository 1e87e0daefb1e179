//! Error types for command dispatch.

use crate::types::ActionKind;
use krake_core::error::KrakeError;

/// Errors from interpreting a command.
///
/// The only failure is a request issued without a selected workspace. Every
/// other input, including empty text, yields a reply.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CommandError {
    pub(crate) fn no_workspace() -> Self {
        CommandError::InvalidRequest("no workspace selected".to_string())
    }
}

impl From<CommandError> for KrakeError {
    fn from(err: CommandError) -> Self {
        KrakeError::Command(err.to_string())
    }
}

/// Errors from applying actions to the host.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("Action not supported by this host: {0}")]
    Unsupported(ActionKind),
    #[error("Applying {kind} failed: {reason}")]
    Failed { kind: ActionKind, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_display() {
        let err = CommandError::no_workspace();
        assert_eq!(err.to_string(), "Invalid request: no workspace selected");
    }

    #[test]
    fn test_command_error_into_krake_error() {
        let err: KrakeError = CommandError::no_workspace().into();
        assert!(matches!(err, KrakeError::Command(_)));
        assert!(err.to_string().contains("no workspace selected"));
    }

    #[test]
    fn test_apply_error_display() {
        let err = ApplyError::Unsupported(ActionKind::TradingAction);
        assert_eq!(
            err.to_string(),
            "Action not supported by this host: trading_action"
        );

        let err = ApplyError::Failed {
            kind: ActionKind::CreateTask,
            reason: "task list unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Applying create_task failed: task list unavailable"
        );
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", CommandError::no_workspace());
        assert!(dbg.contains("InvalidRequest"));

        let dbg = format!("{:?}", ApplyError::Unsupported(ActionKind::OpenAgents));
        assert!(dbg.contains("Unsupported"));
    }
}
