use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{KrakeError, Result};
use crate::types::Workspace;

/// Top-level configuration for Krake.
///
/// Loaded from `~/.krake/config.toml` by default. Every section falls back to
/// its defaults when absent, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KrakeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub interpreter: InterpreterConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub workspaces: WorkspacesConfig,
}

impl KrakeConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: KrakeConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    ///
    /// The warning goes through `tracing`, so call this once a subscriber is
    /// installed. The `krake` binary uses [`KrakeConfig::load`] instead, since
    /// it needs the log level before installing one.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.dispatch.history_limit == 0 {
            return Err(KrakeError::Config(
                "dispatch.history_limit must be at least 1".to_string(),
            ));
        }
        if self.interpreter.default_task_title.trim().is_empty() {
            return Err(KrakeError::Config(
                "interpreter.default_task_title must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for ws in &self.workspaces.entries {
            if ws.name.trim().is_empty() {
                return Err(KrakeError::Config(format!(
                    "workspace {} has an empty name",
                    ws.id
                )));
            }
            if !seen.insert(ws.id) {
                return Err(KrakeError::Config(format!(
                    "duplicate workspace id: {}",
                    ws.id
                )));
            }
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Command interpreter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Enable namespaced service calls and the affiliate/trading/email
    /// keyword rules on top of the base rule table.
    pub extended_rules: bool,
    /// Title given to tasks created from a command.
    pub default_task_title: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            extended_rules: false,
            default_task_title: "New task from command".to_string(),
        }
    }
}

/// Dispatch host settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Artificial latency before a response is published, in milliseconds.
    pub latency_ms: u64,
    /// Maximum number of command history entries kept in memory.
    pub history_limit: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            latency_ms: 500,
            history_limit: 50,
        }
    }
}

/// Workspace catalogue settings.
///
/// An empty `entries` list means the built-in workspaces are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspacesConfig {
    /// Name of the workspace selected at startup.
    pub default: Option<String>,
    pub entries: Vec<Workspace>,
}
