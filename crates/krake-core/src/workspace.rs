//! Workspace catalogue.
//!
//! The registry is loaded once at startup and never mutated afterwards.
//! Consumers pick the "current" workspace from it by value.

use uuid::Uuid;

use crate::config::WorkspacesConfig;
use crate::error::{KrakeError, Result};
use crate::types::Workspace;

/// Built-in workspaces used when the configuration lists none.
const BUILTIN_WORKSPACES: &[(u128, &str, &str)] = &[
    (1, "Lunavo", "Lunavo workspace for e-commerce operations"),
    (2, "Monarch", "Monarch workspace for app management"),
    (3, "Lunabots", "Lunabots workspace for bot management"),
    (4, "Hard Life Mode", "Hard Life Mode workspace for social media"),
    (5, "Management", "Management workspace for system oversight"),
];

/// Read-only catalogue of the workspaces a user can select.
#[derive(Debug, Clone)]
pub struct WorkspaceRegistry {
    workspaces: Vec<Workspace>,
    default_name: Option<String>,
}

impl Default for WorkspaceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WorkspaceRegistry {
    /// Create a registry over an explicit list of workspaces.
    pub fn new(workspaces: Vec<Workspace>) -> Self {
        Self {
            workspaces,
            default_name: None,
        }
    }

    /// The five built-in workspaces.
    pub fn builtin() -> Self {
        let workspaces = BUILTIN_WORKSPACES
            .iter()
            .map(|(id, name, description)| Workspace::new(Uuid::from_u128(*id), *name, *description))
            .collect();
        Self::new(workspaces)
    }

    /// Build the registry from configuration.
    ///
    /// Falls back to the built-in set when no entries are configured. A
    /// configured default that names no known workspace is an error.
    pub fn from_config(config: &WorkspacesConfig) -> Result<Self> {
        let mut registry = if config.entries.is_empty() {
            Self::builtin()
        } else {
            Self::new(config.entries.clone())
        };

        if let Some(name) = &config.default {
            if registry.find_by_name(name).is_none() {
                return Err(KrakeError::Workspace(format!(
                    "default workspace not found: {}",
                    name
                )));
            }
            registry.default_name = Some(name.clone());
        }

        tracing::debug!(count = registry.workspaces.len(), "Workspace registry loaded");
        Ok(registry)
    }

    /// All workspaces in catalogue order.
    pub fn list(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    /// Look up a workspace by id.
    pub fn get(&self, id: Uuid) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.id == id)
    }

    /// Look up a workspace by display name, ignoring case and surrounding whitespace.
    pub fn find_by_name(&self, name: &str) -> Option<&Workspace> {
        let wanted = name.trim();
        self.workspaces
            .iter()
            .find(|w| w.name.eq_ignore_ascii_case(wanted))
    }

    /// The workspace selected at startup: the configured default, else the
    /// first entry. `None` only when the registry is empty.
    pub fn default_workspace(&self) -> Option<&Workspace> {
        self.default_name
            .as_deref()
            .and_then(|name| self.find_by_name(name))
            .or_else(|| self.workspaces.first())
    }
}
