//! Command interpretation and dispatch for Krake.
//!
//! Turns a free-text command plus the selected workspace into a reply and an
//! ordered list of typed actions, and hosts the observable dispatch state the
//! UI reacts to.

pub mod applier;
pub mod dispatch;
pub mod error;
pub mod interpreter;
pub mod rules;
pub mod service_call;
pub mod types;

pub use applier::{apply_all, ActionApplier};
pub use dispatch::DispatchHost;
pub use error::{ApplyError, CommandError};
pub use interpreter::Interpreter;
pub use rules::{Matcher, Rule, RuleContext, RuleTable};
pub use service_call::ServiceCall;
pub use types::{
    Action, ActionKind, CommandHistoryEntry, CommandRequest, CommandResponse, Integration,
    Intent, Service,
};
