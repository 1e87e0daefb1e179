//! Core types and value objects for command dispatch.
//!
//! Defines intents, the closed action union, requests, responses and the
//! command history record.

use krake_core::types::{Timestamp, Workspace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// String arguments of a namespaced service call, ordered by key.
pub type CallArgs = BTreeMap<String, String>;

// =============================================================================
// Enums
// =============================================================================

/// Classified purpose of a free-text command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    CreateTask,
    OpenIntegration,
    OpenAgents,
    ServiceCall,
    Unknown,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Greeting => write!(f, "greeting"),
            Intent::CreateTask => write!(f, "create_task"),
            Intent::OpenIntegration => write!(f, "open_integration"),
            Intent::OpenAgents => write!(f, "open_agents"),
            Intent::ServiceCall => write!(f, "service_call"),
            Intent::Unknown => write!(f, "unknown"),
        }
    }
}

/// Integration panels a command can ask the UI to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integration {
    Shopify,
    Gelato,
    Binance,
    AffiliateBot,
    TradingBot,
    Email,
}

impl Integration {
    /// Human-facing product name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Integration::Shopify => "Shopify",
            Integration::Gelato => "Gelato",
            Integration::Binance => "Binance",
            Integration::AffiliateBot => "Affiliate Bot Manager",
            Integration::TradingBot => "ProfitPilot Trading Bot",
            Integration::Email => "Email Builder & Manager",
        }
    }
}

impl fmt::Display for Integration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integration::Shopify => write!(f, "shopify"),
            Integration::Gelato => write!(f, "gelato"),
            Integration::Binance => write!(f, "binance"),
            Integration::AffiliateBot => write!(f, "affiliate_bot"),
            Integration::TradingBot => write!(f, "trading_bot"),
            Integration::Email => write!(f, "email"),
        }
    }
}

impl std::str::FromStr for Integration {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shopify" => Ok(Integration::Shopify),
            "gelato" => Ok(Integration::Gelato),
            "binance" => Ok(Integration::Binance),
            "affiliate_bot" => Ok(Integration::AffiliateBot),
            "trading_bot" => Ok(Integration::TradingBot),
            "email" => Ok(Integration::Email),
            _ => Err(format!("Unknown integration: {}", s)),
        }
    }
}

/// Back-office services addressable through `service.operation(...)` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Email,
    Monarch,
    Affiliate,
    Trading,
    System,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Email => write!(f, "email"),
            Service::Monarch => write!(f, "monarch"),
            Service::Affiliate => write!(f, "affiliate"),
            Service::Trading => write!(f, "trading"),
            Service::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for Service {
    type Err = String;
    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(Service::Email),
            "monarch" => Ok(Service::Monarch),
            "affiliate" => Ok(Service::Affiliate),
            "trading" => Ok(Service::Trading),
            "system" => Ok(Service::System),
            _ => Err(format!("Unknown service: {}", s)),
        }
    }
}

/// Discriminant of an [`Action`], as it appears in the `kind` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    CreateTask,
    OpenIntegration,
    OpenAgents,
    EmailAction,
    MonarchAction,
    AffiliateAction,
    TradingAction,
    SystemAction,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::CreateTask => write!(f, "create_task"),
            ActionKind::OpenIntegration => write!(f, "open_integration"),
            ActionKind::OpenAgents => write!(f, "open_agents"),
            ActionKind::EmailAction => write!(f, "email_action"),
            ActionKind::MonarchAction => write!(f, "monarch_action"),
            ActionKind::AffiliateAction => write!(f, "affiliate_action"),
            ActionKind::TradingAction => write!(f, "trading_action"),
            ActionKind::SystemAction => write!(f, "system_action"),
        }
    }
}

// =============================================================================
// Action
// =============================================================================

/// An operation the host UI should perform after a command is interpreted.
///
/// Each variant carries only the fields it needs. Serialized with a `kind`
/// discriminator, e.g. `{"kind":"open_integration","integration":"shopify"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    CreateTask {
        task_id: Uuid,
        title: String,
    },
    OpenIntegration {
        integration: Integration,
    },
    OpenAgents,
    #[serde(rename = "email_action")]
    Email {
        operation: String,
        args: CallArgs,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        handler: Option<String>,
    },
    #[serde(rename = "monarch_action")]
    Monarch { operation: String, args: CallArgs },
    #[serde(rename = "affiliate_action")]
    Affiliate { operation: String, args: CallArgs },
    #[serde(rename = "trading_action")]
    Trading { operation: String, args: CallArgs },
    #[serde(rename = "system_action")]
    System { operation: String, args: CallArgs },
}

impl Action {
    /// A task-creation action with a freshly generated id.
    pub fn create_task(title: impl Into<String>) -> Self {
        Action::CreateTask {
            task_id: Uuid::new_v4(),
            title: title.into(),
        }
    }

    pub fn open_integration(integration: Integration) -> Self {
        Action::OpenIntegration { integration }
    }

    /// The action for a resolved service call.
    ///
    /// `handler` is only meaningful for email replies and is dropped for
    /// every other service.
    pub fn service_call(
        service: Service,
        operation: impl Into<String>,
        args: CallArgs,
        handler: Option<String>,
    ) -> Self {
        let operation = operation.into();
        match service {
            Service::Email => Action::Email {
                operation,
                args,
                handler,
            },
            Service::Monarch => Action::Monarch { operation, args },
            Service::Affiliate => Action::Affiliate { operation, args },
            Service::Trading => Action::Trading { operation, args },
            Service::System => Action::System { operation, args },
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::CreateTask { .. } => ActionKind::CreateTask,
            Action::OpenIntegration { .. } => ActionKind::OpenIntegration,
            Action::OpenAgents => ActionKind::OpenAgents,
            Action::Email { .. } => ActionKind::EmailAction,
            Action::Monarch { .. } => ActionKind::MonarchAction,
            Action::Affiliate { .. } => ActionKind::AffiliateAction,
            Action::Trading { .. } => ActionKind::TradingAction,
            Action::System { .. } => ActionKind::SystemAction,
        }
    }
}

// =============================================================================
// Request / Response
// =============================================================================

/// A raw command plus the workspace it was issued in.
///
/// A request without a workspace is representable so callers can forward
/// whatever selection state they have; interpreting it fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub text: String,
    pub workspace: Option<Workspace>,
}

impl CommandRequest {
    pub fn new(text: impl Into<String>, workspace: Workspace) -> Self {
        Self {
            text: text.into(),
            workspace: Some(workspace),
        }
    }

    pub fn without_workspace(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            workspace: None,
        }
    }
}

/// Reply text plus the actions the UI applies, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub reply: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl CommandResponse {
    pub fn reply_only(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_action(reply: impl Into<String>, action: Action) -> Self {
        Self {
            reply: reply.into(),
            actions: vec![action],
        }
    }

    pub fn action_kinds(&self) -> Vec<ActionKind> {
        self.actions.iter().map(Action::kind).collect()
    }
}

/// One processed command, kept by the dispatch host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandHistoryEntry {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub command: String,
    pub reply: String,
    pub created_at: Timestamp,
}
