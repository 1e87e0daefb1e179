//! Krake terminal binary - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Build the workspace registry and pick the startup workspace
//! 3. Build the interpreter and dispatch host
//! 4. Run one command, or read commands from stdin until `:quit`

mod applier;
mod cli;
mod prompt;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use krake_command::{
    apply_all, ActionApplier, CommandError, CommandResponse, DispatchHost, Interpreter,
};
use krake_core::{KrakeConfig, Workspace, WorkspaceRegistry};

use crate::applier::LoggingApplier;
use crate::cli::CliArgs;
use crate::prompt::Input;

/// Send one command and hand its actions to the applier, against the
/// workspace that was selected when the command was sent.
async fn send_and_apply(
    host: &DispatchHost,
    applier: &dyn ActionApplier,
    text: &str,
) -> Result<(CommandResponse, Option<Workspace>), CommandError> {
    let workspace = host.current_workspace();
    let response = host.send_command(text).await?;

    if let Some(workspace) = &workspace {
        if let Err(e) = apply_all(applier, &response, workspace).await {
            tracing::warn!(error = %e, "Action not applied");
        }
    }
    Ok((response, workspace))
}

async fn run_command(
    host: &DispatchHost,
    applier: &LoggingApplier,
    text: &str,
    json: bool,
) -> Result<(), CommandError> {
    let (response, _) = send_and_apply(host, applier, text).await?;
    println!("{}", prompt::render_response(&response, json));
    Ok(())
}

async fn repl(
    host: &DispatchHost,
    registry: &WorkspaceRegistry,
    applier: &LoggingApplier,
    json: bool,
) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let label = host
            .current_workspace()
            .map(|w| w.name)
            .unwrap_or_else(|| "no workspace".to_string());
        stdout.write_all(format!("krake [{}]> ", label).as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match prompt::parse_input(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Command(text) => {
                if let Err(e) = run_command(host, applier, &text, json).await {
                    eprintln!("{}", e);
                }
            }
            Input::SelectWorkspace(name) => match registry.find_by_name(&name) {
                Some(workspace) => {
                    host.select_workspace(workspace.clone());
                    println!("Switched to {}", workspace);
                }
                None => eprintln!("Unknown workspace: {}", name),
            },
            Input::ListWorkspaces => {
                let current = host.current_workspace();
                println!(
                    "{}",
                    prompt::render_workspaces(registry.list(), current.as_ref())
                );
            }
            Input::History => println!("{}", prompt::render_history(&host.history())),
            Input::UnknownDirective(d) => eprintln!("Unknown directive: :{}", d),
        }
    }
    Ok(())
}

fn startup_workspace(
    registry: &WorkspaceRegistry,
    requested: Option<&str>,
) -> Result<Option<Workspace>, Box<dyn std::error::Error>> {
    match requested {
        Some(name) => registry
            .find_by_name(name)
            .cloned()
            .map(Some)
            .ok_or_else(|| format!("Unknown workspace: {}", name).into()),
        None => Ok(registry.default_workspace().cloned()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Not `load_or_default`: its warning would be emitted before the
    // subscriber exists, and the config's log level is needed to build it.
    let config_file = args.resolve_config_path();
    let loaded = if config_file.exists() {
        Some(KrakeConfig::load(&config_file))
    } else {
        None
    };
    let config_level = match &loaded {
        Some(Ok(config)) => Some(config.general.log_level.clone()),
        _ => None,
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            args.resolve_log_level(config_level.as_deref()),
        ))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Krake v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match loaded {
        Some(Ok(config)) => {
            tracing::info!(path = %config_file.display(), "Configuration loaded");
            config
        }
        Some(Err(e)) => {
            tracing::warn!(
                path = %config_file.display(),
                error = %e,
                "Failed to load config, using defaults"
            );
            KrakeConfig::default()
        }
        None => KrakeConfig::default(),
    };

    if let Some(latency_ms) = args.latency_ms {
        config.dispatch.latency_ms = latency_ms;
    }
    if args.extended {
        config.interpreter.extended_rules = true;
    }

    let registry = WorkspaceRegistry::from_config(&config.workspaces)?;
    tracing::info!(count = registry.len(), "Workspaces ready");

    let host = DispatchHost::new(
        Interpreter::from_config(&config.interpreter),
        &config.dispatch,
    );
    if let Some(workspace) = startup_workspace(&registry, args.workspace.as_deref())? {
        tracing::info!(workspace = %workspace, "Workspace selected");
        host.select_workspace(workspace);
    }

    let applier = LoggingApplier::with_disabled(args.disabled_integrations.iter().copied());

    if let Some(text) = args.one_shot() {
        run_command(&host, &applier, &text, args.json).await?;
    } else {
        repl(&host, &registry, &applier, args.json).await?;
    }

    tracing::info!(applied = applier.applied_count(), "Krake stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_workspace_default() {
        let registry = WorkspaceRegistry::builtin();
        let ws = startup_workspace(&registry, None).unwrap().unwrap();
        assert_eq!(ws.name, "Lunavo");
    }

    #[test]
    fn test_startup_workspace_by_name() {
        let registry = WorkspaceRegistry::builtin();
        let ws = startup_workspace(&registry, Some("hard life mode"))
            .unwrap()
            .unwrap();
        assert_eq!(ws.name, "Hard Life Mode");
    }

    #[test]
    fn test_startup_workspace_unknown() {
        let registry = WorkspaceRegistry::builtin();
        assert!(startup_workspace(&registry, Some("Nowhere")).is_err());
    }

    #[tokio::test]
    async fn test_actions_apply_to_workspace_at_send_time() {
        let registry = WorkspaceRegistry::builtin();
        let lunavo = registry.find_by_name("Lunavo").cloned().unwrap();
        let monarch = registry.find_by_name("Monarch").cloned().unwrap();

        let host = DispatchHost::new(
            Interpreter::new(),
            &krake_core::config::DispatchConfig {
                latency_ms: 50,
                history_limit: 10,
            },
        );
        host.select_workspace(lunavo.clone());
        let applier = LoggingApplier::new();

        let (sent, _) = tokio::join!(send_and_apply(&host, &applier, "open shopify"), async {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            host.select_workspace(monarch.clone());
        });

        let (response, applied_to) = sent.unwrap();
        assert_eq!(response.reply, "I'm checking Shopify for you.");
        assert_eq!(applied_to.map(|w| w.id), Some(lunavo.id));
        assert_eq!(host.current_workspace().map(|w| w.id), Some(monarch.id));
        assert_eq!(applier.applied_count(), 1);
    }

    #[tokio::test]
    async fn test_send_without_workspace_applies_nothing() {
        let host = DispatchHost::new(
            Interpreter::new(),
            &krake_core::config::DispatchConfig::default(),
        );
        let applier = LoggingApplier::new();
        assert!(send_and_apply(&host, &applier, "hello").await.is_err());
        assert_eq!(applier.applied_count(), 0);
    }
}
