//! Line-oriented prompt: input parsing and response rendering.

use krake_command::{Action, CommandHistoryEntry, CommandResponse};
use krake_core::Workspace;

/// One line read from the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Free text for the interpreter.
    Command(String),
    /// `:workspace <name>`
    SelectWorkspace(String),
    /// `:workspaces`
    ListWorkspaces,
    /// `:history`
    History,
    /// `:quit` or `:q`
    Quit,
    /// Blank line.
    Empty,
    /// Any other `:` directive.
    UnknownDirective(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(directive) = line.strip_prefix(':') else {
        return Input::Command(line.to_string());
    };

    let (name, rest) = match directive.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (directive, ""),
    };
    match name {
        "workspace" | "ws" if !rest.is_empty() => Input::SelectWorkspace(rest.to_string()),
        "workspaces" => Input::ListWorkspaces,
        "history" => Input::History,
        "quit" | "q" | "exit" => Input::Quit,
        _ => Input::UnknownDirective(directive.to_string()),
    }
}

/// Render a response for the terminal, as text or pretty JSON.
pub fn render_response(response: &CommandResponse, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(response)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e));
    }
    let mut out = response.reply.clone();
    for action in &response.actions {
        out.push_str("\n  -> ");
        out.push_str(&describe_action(action));
    }
    out
}

/// One-line summary of an action.
pub fn describe_action(action: &Action) -> String {
    match action {
        Action::CreateTask { task_id, title } => format!("create_task \"{}\" ({})", title, task_id),
        Action::OpenIntegration { integration } => {
            format!("open_integration {}", integration.display_name())
        }
        Action::OpenAgents => "open_agents".to_string(),
        Action::Email {
            operation,
            args,
            handler,
        } => {
            let mut s = format!("email_action {}{}", operation, render_args(args));
            if let Some(h) = handler {
                s.push_str(&format!(" [handler: {}]", h));
            }
            s
        }
        Action::Monarch { operation, args }
        | Action::Affiliate { operation, args }
        | Action::Trading { operation, args }
        | Action::System { operation, args } => {
            format!("{} {}{}", action.kind(), operation, render_args(args))
        }
    }
}

fn render_args(args: &krake_command::types::CallArgs) -> String {
    if args.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = args.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
    format!("({})", pairs.join(", "))
}

pub fn render_workspaces(workspaces: &[Workspace], current: Option<&Workspace>) -> String {
    workspaces
        .iter()
        .map(|w| {
            let marker = if current.map(|c| c.id) == Some(w.id) { "*" } else { " " };
            format!("{} {}: {}", marker, w.name, w.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_history(history: &[CommandHistoryEntry]) -> String {
    if history.is_empty() {
        return "(no commands yet)".to_string();
    }
    history
        .iter()
        .map(|h| format!("[{}] {} => {}", h.created_at, h.command, h.reply))
        .collect::<Vec<_>>()
        .join("\n")
}
