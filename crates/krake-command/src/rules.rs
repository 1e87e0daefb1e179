//! Ordered keyword rules for command classification.
//!
//! Each rule pairs a keyword matcher with a response builder. Rules are
//! evaluated top to bottom against the lowercased command and the first match
//! wins; rules never combine.

use std::fmt;

use krake_core::types::Workspace;

use crate::types::{Action, CommandResponse, Integration, Intent};

/// Inputs available to a rule's response builder.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The command as typed.
    pub text: &'a str,
    pub workspace: &'a Workspace,
    /// Title for tasks created from a command.
    pub task_title: &'a str,
}

/// Case-insensitive substring matcher over the command text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Matches when at least one keyword occurs.
    AnyOf(Vec<String>),
    /// Matches when every keyword occurs, in any order or position.
    AllOf(Vec<String>),
}

impl Matcher {
    pub fn any_of(keywords: &[&str]) -> Self {
        Matcher::AnyOf(keywords.iter().map(|k| k.to_lowercase()).collect())
    }

    pub fn all_of(keywords: &[&str]) -> Self {
        Matcher::AllOf(keywords.iter().map(|k| k.to_lowercase()).collect())
    }

    /// `lowered` must already be lowercased.
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Matcher::AnyOf(keywords) => keywords.iter().any(|k| lowered.contains(k.as_str())),
            Matcher::AllOf(keywords) => keywords.iter().all(|k| lowered.contains(k.as_str())),
        }
    }
}

type Responder = Box<dyn Fn(&RuleContext<'_>) -> CommandResponse + Send + Sync>;

/// A single classification rule.
pub struct Rule {
    name: String,
    intent: Intent,
    matcher: Matcher,
    respond: Responder,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("intent", &self.intent)
            .field("matcher", &self.matcher)
            .finish()
    }
}

impl Rule {
    pub fn new<F>(name: impl Into<String>, intent: Intent, matcher: Matcher, respond: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> CommandResponse + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            intent,
            matcher,
            respond: Box::new(respond),
        }
    }

    /// A rule whose reply never varies and carries no actions.
    pub fn reply(name: &str, intent: Intent, matcher: Matcher, reply: &'static str) -> Self {
        Self::new(name, intent, matcher, move |_| CommandResponse::reply_only(reply))
    }

    /// A rule that opens an integration panel.
    pub fn integration(
        name: &str,
        matcher: Matcher,
        integration: Integration,
        reply: &'static str,
    ) -> Self {
        Self::new(name, Intent::OpenIntegration, matcher, move |_| {
            CommandResponse::with_action(reply, Action::open_integration(integration))
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.matcher.matches(lowered)
    }

    pub fn respond(&self, ctx: &RuleContext<'_>) -> CommandResponse {
        (self.respond)(ctx)
    }
}

/// Ordered collection of rules. Position is priority.
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::base()
    }
}

impl RuleTable {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The six built-in rules, in their fixed priority order.
    pub fn base() -> Self {
        let mut table = Self::empty();
        table.push(Rule::reply(
            "greeting",
            Intent::Greeting,
            Matcher::any_of(&["hello", "hi"]),
            "Hello! How can I assist you today?",
        ));
        table.push(Rule::new(
            "create_task",
            Intent::CreateTask,
            Matcher::all_of(&["task", "create"]),
            |ctx| {
                CommandResponse::with_action(
                    "I've created a new task for you.",
                    Action::create_task(ctx.task_title),
                )
            },
        ));
        table.push(Rule::integration(
            "shopify",
            Matcher::any_of(&["shopify"]),
            Integration::Shopify,
            "I'm checking Shopify for you.",
        ));
        table.push(Rule::integration(
            "gelato",
            Matcher::any_of(&["gelato"]),
            Integration::Gelato,
            "I'm checking Gelato for you.",
        ));
        table.push(Rule::integration(
            "binance",
            Matcher::any_of(&["binance"]),
            Integration::Binance,
            "I'm checking Binance for you.",
        ));
        table.push(Rule::new(
            "agents",
            Intent::OpenAgents,
            Matcher::any_of(&["agent", "sintra"]),
            |_| {
                CommandResponse::with_action(
                    "I'm connecting you with the Sintra AI agents.",
                    Action::OpenAgents,
                )
            },
        ));
        table
    }

    /// The base rules followed by the affiliate, trading and email keywords.
    pub fn extended() -> Self {
        let mut table = Self::base();
        table.push(Rule::integration(
            "affiliate",
            Matcher::any_of(&["affiliate"]),
            Integration::AffiliateBot,
            "Opening Affiliate Bot Manager.",
        ));
        table.push(Rule::integration(
            "trading",
            Matcher::any_of(&["trading", "profitpilot", "finance bot"]),
            Integration::TradingBot,
            "Opening ProfitPilot Trading Bot.",
        ));
        table.push(Rule::integration(
            "email",
            Matcher::any_of(&["email"]),
            Integration::Email,
            "Opening Email Builder & Manager.",
        ));
        table
    }

    /// Append a rule at the lowest priority.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in priority order.
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::name).collect()
    }

    /// The highest-priority rule matching the text, if any.
    pub fn first_match(&self, text: &str) -> Option<&Rule> {
        let lowered = text.to_lowercase();
        self.rules.iter().find(|r| r.matches(&lowered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn first(table: &RuleTable, text: &str) -> Option<String> {
        table.first_match(text).map(|r| r.name().to_string())
    }

    fn workspace() -> Workspace {
        Workspace::new(Uuid::nil(), "Lunavo", "")
    }

    #[test]
    fn test_base_rule_order() {
        assert_eq!(
            RuleTable::base().names(),
            vec!["greeting", "create_task", "shopify", "gelato", "binance", "agents"]
        );
    }

    #[test]
    fn test_extended_appends_after_base() {
        let extended = RuleTable::extended();
        let base = RuleTable::base();
        let names = extended.names();
        assert_eq!(&names[..6], base.names().as_slice());
        assert_eq!(&names[6..], &["affiliate", "trading", "email"]);
    }

    #[test]
    fn test_any_of_matcher() {
        let m = Matcher::any_of(&["agent", "sintra"]);
        assert!(m.matches("talk to sintra"));
        assert!(m.matches("open agents"));
        assert!(!m.matches("open the panel"));
    }

    #[test]
    fn test_all_of_matcher_any_order() {
        let m = Matcher::all_of(&["task", "create"]);
        assert!(m.matches("please create a task"));
        assert!(m.matches("task: create one"));
        assert!(!m.matches("create a note"));
        assert!(!m.matches("list my tasks"));
    }

    #[test]
    fn test_matcher_keywords_are_lowercased() {
        let m = Matcher::any_of(&["Shopify"]);
        assert_eq!(m, Matcher::AnyOf(vec!["shopify".to_string()]));
        assert!(m.matches("check shopify"));
    }

    #[test]
    fn test_first_match_is_case_insensitive() {
        let table = RuleTable::base();
        assert_eq!(first(&table, "HELLO THERE").as_deref(), Some("greeting"));
        assert_eq!(first(&table, "Open SHOPIFY").as_deref(), Some("shopify"));
    }

    #[test]
    fn test_shopify_beats_binance() {
        let table = RuleTable::base();
        assert_eq!(first(&table, "binance and shopify").as_deref(), Some("shopify"));
    }

    #[test]
    fn test_greeting_substring_inside_words() {
        // "this" contains "hi"
        let table = RuleTable::base();
        assert_eq!(first(&table, "open this in gelato").as_deref(), Some("greeting"));
    }

    #[test]
    fn test_no_match_returns_none() {
        assert!(RuleTable::base().first_match("xyz123").is_none());
        assert!(RuleTable::base().first_match("").is_none());
    }

    #[test]
    fn test_extended_keywords() {
        let table = RuleTable::extended();
        assert_eq!(first(&table, "affiliate links").as_deref(), Some("affiliate"));
        assert_eq!(first(&table, "open profitpilot").as_deref(), Some("trading"));
        assert_eq!(first(&table, "the finance bot").as_deref(), Some("trading"));
        assert_eq!(first(&table, "draft an email").as_deref(), Some("email"));
        assert!(RuleTable::base().first_match("draft an email").is_none());
    }

    #[test]
    fn test_push_appends_lowest_priority() {
        let mut table = RuleTable::base();
        table.push(Rule::integration(
            "gelato_alias",
            Matcher::any_of(&["print on demand"]),
            Integration::Gelato,
            "I'm checking Gelato for you.",
        ));
        assert_eq!(table.len(), 7);
        assert_eq!(
            first(&table, "print on demand orders").as_deref(),
            Some("gelato_alias")
        );
        // Earlier rules still win.
        assert_eq!(
            first(&table, "print on demand via shopify").as_deref(),
            Some("shopify")
        );
    }

    #[test]
    fn test_create_task_rule_uses_context_title() {
        let ws = workspace();
        let table = RuleTable::base();
        let rule = table.first_match("create task").unwrap();
        let ctx = RuleContext {
            text: "create task",
            workspace: &ws,
            task_title: "Follow up",
        };
        let response = rule.respond(&ctx);
        match &response.actions[..] {
            [Action::CreateTask { title, .. }] => assert_eq!(title, "Follow up"),
            other => panic!("unexpected actions: {:?}", other),
        }
    }

    #[test]
    fn test_rule_debug_omits_responder() {
        let rule = Rule::reply("greeting", Intent::Greeting, Matcher::any_of(&["hi"]), "Hi");
        let dbg = format!("{:?}", rule);
        assert!(dbg.contains("greeting"));
        assert!(dbg.contains("AnyOf"));
    }
}
