//! Command interpreter.
//!
//! Pure and synchronous: classifies a command and describes what the host
//! should do. It never opens panels, creates tasks or calls services itself.

use krake_core::config::InterpreterConfig;

use crate::error::CommandError;
use crate::rules::{Rule, RuleContext, RuleTable};
use crate::service_call::ServiceCall;
use crate::types::{CommandRequest, CommandResponse, Intent};

/// Reply used when no rule matches.
pub const FALLBACK_REPLY: &str =
    "I'm not sure how to process that command. Could you please rephrase?";

/// Turns a [`CommandRequest`] into a [`CommandResponse`].
#[derive(Debug)]
pub struct Interpreter {
    rules: RuleTable,
    service_calls: bool,
    task_title: String,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Interpreter with the base rule table only.
    pub fn new() -> Self {
        Self::from_config(&InterpreterConfig::default())
    }

    /// Interpreter with service calls and the extended keyword rules.
    pub fn extended() -> Self {
        Self::from_config(&InterpreterConfig {
            extended_rules: true,
            ..InterpreterConfig::default()
        })
    }

    pub fn from_config(config: &InterpreterConfig) -> Self {
        let rules = if config.extended_rules {
            RuleTable::extended()
        } else {
            RuleTable::base()
        };
        Self {
            rules,
            service_calls: config.extended_rules,
            task_title: config.default_task_title.clone(),
        }
    }

    /// Append a rule below the built-in ones.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn service_calls_enabled(&self) -> bool {
        self.service_calls
    }

    /// Classify text without building a response.
    pub fn classify(&self, text: &str) -> Intent {
        if let Some(call) = self.service_call(text) {
            return if call.canonical_operation().is_some() {
                Intent::ServiceCall
            } else {
                Intent::Unknown
            };
        }
        self.rules
            .first_match(text)
            .map(Rule::intent)
            .unwrap_or(Intent::Unknown)
    }

    /// Interpret a command.
    ///
    /// Fails only when the request carries no workspace. A call to a known
    /// service with an unknown operation (`email.foo(x: y)`) gets the fallback
    /// reply instead of falling through to the keyword rules.
    pub fn interpret(&self, request: &CommandRequest) -> Result<CommandResponse, CommandError> {
        let workspace = request
            .workspace
            .as_ref()
            .ok_or_else(CommandError::no_workspace)?;

        // A well-formed call to an unknown operation does not fall back to
        // keyword matching.
        if let Some(call) = self.service_call(&request.text) {
            let response = call
                .resolve()
                .unwrap_or_else(|| CommandResponse::reply_only(FALLBACK_REPLY));
            tracing::debug!(
                workspace = %workspace.name,
                service = %call.service,
                operation = %call.operation,
                actions = response.actions.len(),
                "Interpreted service call"
            );
            return Ok(response);
        }

        let response = match self.rules.first_match(&request.text) {
            Some(rule) => {
                let ctx = RuleContext {
                    text: &request.text,
                    workspace,
                    task_title: &self.task_title,
                };
                tracing::debug!(
                    workspace = %workspace.name,
                    rule = rule.name(),
                    intent = %rule.intent(),
                    "Command matched rule"
                );
                rule.respond(&ctx)
            }
            None => {
                tracing::debug!(workspace = %workspace.name, "No rule matched command");
                CommandResponse::reply_only(FALLBACK_REPLY)
            }
        };
        Ok(response)
    }

    fn service_call(&self, text: &str) -> Option<ServiceCall> {
        if self.service_calls {
            ServiceCall::parse(text)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Matcher;
    use crate::types::{Action, ActionKind, Integration};
    use krake_core::types::Workspace;
    use uuid::Uuid;

    fn lunavo() -> Workspace {
        Workspace::new(
            Uuid::from_u128(1),
            "Lunavo",
            "Lunavo workspace for e-commerce operations",
        )
    }

    fn run(interpreter: &Interpreter, text: &str) -> CommandResponse {
        interpreter
            .interpret(&CommandRequest::new(text, lunavo()))
            .unwrap()
    }

    #[test]
    fn test_greeting() {
        let response = run(&Interpreter::new(), "hi there");
        assert_eq!(response.reply, "Hello! How can I assist you today?");
        assert!(response.actions.is_empty());
    }

    #[test]
    fn test_create_task() {
        let response = run(&Interpreter::new(), "please create a task for review");
        assert_eq!(response.reply, "I've created a new task for you.");
        match &response.actions[..] {
            [Action::CreateTask { title, .. }] => assert_eq!(title, "New task from command"),
            other => panic!("unexpected actions: {:?}", other),
        }
    }

    #[test]
    fn test_create_task_ids_unique_per_call() {
        let interpreter = Interpreter::new();
        let a = run(&interpreter, "create task");
        let b = run(&interpreter, "create task");
        assert_ne!(a.actions, b.actions);
        assert_eq!(a.reply, b.reply);
        assert_eq!(a.action_kinds(), b.action_kinds());
    }

    #[test]
    fn test_integrations() {
        let interpreter = Interpreter::new();
        let cases = [
            ("open shopify", "I'm checking Shopify for you.", Integration::Shopify),
            ("gelato orders", "I'm checking Gelato for you.", Integration::Gelato),
            ("check binance balance", "I'm checking Binance for you.", Integration::Binance),
        ];
        for (text, reply, integration) in cases {
            let response = run(&interpreter, text);
            assert_eq!(response.reply, reply);
            assert_eq!(response.actions, vec![Action::open_integration(integration)]);
        }
    }

    #[test]
    fn test_agents() {
        let response = run(&Interpreter::new(), "talk to sintra");
        assert_eq!(response.reply, "I'm connecting you with the Sintra AI agents.");
        assert_eq!(response.actions, vec![Action::OpenAgents]);
    }

    #[test]
    fn test_fallback() {
        let response = run(&Interpreter::new(), "xyz123");
        assert_eq!(response.reply, FALLBACK_REPLY);
        assert!(response.actions.is_empty());
    }

    #[test]
    fn test_empty_text_falls_back() {
        let response = run(&Interpreter::new(), "");
        assert_eq!(response.reply, FALLBACK_REPLY);
    }

    #[test]
    fn test_missing_workspace_is_invalid() {
        let interpreter = Interpreter::new();
        let err = interpreter
            .interpret(&CommandRequest::without_workspace("hello"))
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidRequest(_)));
    }

    #[test]
    fn test_custom_task_title() {
        let config = InterpreterConfig {
            default_task_title: "Triage inbox".to_string(),
            ..InterpreterConfig::default()
        };
        let response = run(&Interpreter::from_config(&config), "create a task");
        match &response.actions[..] {
            [Action::CreateTask { title, .. }] => assert_eq!(title, "Triage inbox"),
            other => panic!("unexpected actions: {:?}", other),
        }
    }

    #[test]
    fn test_base_ignores_service_calls() {
        let interpreter = Interpreter::new();
        assert!(!interpreter.service_calls_enabled());
        let response = run(&interpreter, "system.verify");
        assert_eq!(response.reply, FALLBACK_REPLY);
    }

    #[test]
    fn test_extended_service_call_precedes_keywords() {
        let interpreter = Interpreter::extended();
        // Without service calls "email" would open the email integration.
        let response = run(&interpreter, "email.send(recipients: ops@lunavo.io)");
        assert_eq!(response.reply, "Sending email to ops@lunavo.io");
        assert_eq!(response.action_kinds(), vec![ActionKind::EmailAction]);
    }

    #[test]
    fn test_extended_unknown_operation_falls_back() {
        let interpreter = Interpreter::extended();
        let response = run(&interpreter, "trading.sellEverything");
        assert_eq!(response.reply, FALLBACK_REPLY);
        assert!(response.actions.is_empty());
        assert_eq!(interpreter.classify("trading.sellEverything"), Intent::Unknown);

        // "email" would match the email keyword rule.
        let response = run(&interpreter, "email.foo(x: y)");
        assert_eq!(response.reply, FALLBACK_REPLY);
        assert!(response.actions.is_empty());
    }

    #[test]
    fn test_extended_keyword_rules() {
        let interpreter = Interpreter::extended();
        let response = run(&interpreter, "open profitpilot");
        assert_eq!(response.reply, "Opening ProfitPilot Trading Bot.");
        assert_eq!(
            response.actions,
            vec![Action::open_integration(Integration::TradingBot)]
        );
    }

    #[test]
    fn test_extended_keeps_base_priority() {
        let interpreter = Interpreter::extended();
        let response = run(&interpreter, "shopify affiliate report");
        assert_eq!(response.reply, "I'm checking Shopify for you.");
    }

    #[test]
    fn test_classify() {
        let interpreter = Interpreter::extended();
        assert_eq!(interpreter.classify("hello"), Intent::Greeting);
        assert_eq!(interpreter.classify("create a task"), Intent::CreateTask);
        assert_eq!(interpreter.classify("binance"), Intent::OpenIntegration);
        assert_eq!(interpreter.classify("agents"), Intent::OpenAgents);
        assert_eq!(interpreter.classify("monarch.updateUI"), Intent::ServiceCall);
        assert_eq!(interpreter.classify("xyz123"), Intent::Unknown);
    }

    #[test]
    fn test_with_rule_extends_below_builtins() {
        let interpreter = Interpreter::new().with_rule(Rule::integration(
            "print_on_demand",
            Matcher::any_of(&["print on demand"]),
            Integration::Gelato,
            "I'm checking Gelato for you.",
        ));
        assert_eq!(interpreter.rules().len(), 7);
        let response = run(&interpreter, "print on demand status");
        assert_eq!(response.actions, vec![Action::open_integration(Integration::Gelato)]);
    }
}
