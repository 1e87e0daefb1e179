//! CLI argument definitions for the `krake` binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use krake_command::Integration;
use std::path::PathBuf;

/// Krake: ask the orchestrator something from the terminal.
#[derive(Parser, Debug)]
#[command(name = "krake", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Workspace to select at startup (by name).
    #[arg(short = 'w', long = "workspace")]
    pub workspace: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Artificial response latency in milliseconds.
    #[arg(long = "latency-ms")]
    pub latency_ms: Option<u64>,

    /// Enable service calls and the extended keyword rules.
    #[arg(long = "extended")]
    pub extended: bool,

    /// Print responses as JSON.
    #[arg(long = "json")]
    pub json: bool,

    /// Refuse to open this integration (repeatable), e.g. `binance`.
    #[arg(long = "disable-integration", value_name = "INTEGRATION")]
    pub disabled_integrations: Vec<Integration>,

    /// Run a single command and exit instead of reading stdin.
    #[arg(trailing_var_arg = true)]
    pub command: Vec<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > KRAKE_CONFIG env var > ~/.krake/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("KRAKE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log filter directive.
    ///
    /// Priority: --log-level flag > RUST_LOG > config file value > "info".
    pub fn resolve_log_level(&self, config_level: Option<&str>) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(level) = std::env::var("RUST_LOG") {
            if !level.is_empty() {
                return level;
            }
        }
        config_level.unwrap_or("info").to_string()
    }

    /// The one-shot command, if any words were given.
    pub fn one_shot(&self) -> Option<String> {
        let text = self.command.join(" ");
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".krake").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".krake").join("config.toml");
    }
    PathBuf::from("config.toml")
}
