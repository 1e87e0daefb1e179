//! Namespaced service calls such as `email.send(recipients: ops@lunavo.io)`.
//!
//! A call is `<service>.<operation>` optionally followed by a parenthesised
//! `key: value` list. Service and operation match case-insensitively; argument
//! keys and values keep the case they were typed in.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::{Action, CallArgs, CommandResponse, Service};

static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*([A-Za-z]+)\.([A-Za-z_]\w*)\s*(?:\((.*))?$")
        .expect("Invalid service call regex")
});

const CUSTOMER_HANDLER: &str = "Cassie - Customer Email Responder";
const DEFAULT_HANDLER: &str = "Krake";

/// Known operations per service, by canonical name.
const OPERATIONS: &[(Service, &[&str])] = &[
    (Service::Email, &["create", "send", "list", "reply"]),
    (
        Service::Monarch,
        &[
            "getAppVersion",
            "syncWeeklyContent",
            "generateWorkoutPlan",
            "resetWorkoutPlan",
            "moderateCommunity",
            "updateUI",
        ],
    ),
    (
        Service::Affiliate,
        &[
            "getNetworks",
            "getProducts",
            "getLinks",
            "getEarnings",
            "getStatistics",
            "createLink",
        ],
    ),
    (
        Service::Trading,
        &[
            "getStrategies",
            "activateStrategy",
            "deactivateStrategy",
            "getTrades",
            "getStatistics",
        ],
    ),
    (Service::System, &["test", "verify"]),
];

/// A syntactically valid call to a known service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCall {
    pub service: Service,
    /// Operation name as typed.
    pub operation: String,
    pub args: CallArgs,
}

impl ServiceCall {
    /// Parse `text` as a service call.
    ///
    /// Returns `None` when the text is not of the `service.operation` form or
    /// names an unknown service.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = CALL_RE.captures(text)?;
        let service: Service = caps.get(1)?.as_str().parse().ok()?;
        let operation = caps.get(2)?.as_str().to_string();
        let args = caps
            .get(3)
            .map(|m| parse_args(m.as_str()))
            .unwrap_or_default();
        Some(Self {
            service,
            operation,
            args,
        })
    }

    /// Canonical name of the operation, or `None` if the service has no such
    /// operation.
    pub fn canonical_operation(&self) -> Option<&'static str> {
        OPERATIONS
            .iter()
            .find(|(service, _)| *service == self.service)
            .and_then(|(_, ops)| {
                ops.iter()
                    .copied()
                    .find(|op| op.eq_ignore_ascii_case(&self.operation))
            })
    }

    /// Build the response for this call, or `None` for an unknown operation.
    pub fn resolve(&self) -> Option<CommandResponse> {
        let operation = self.canonical_operation()?;
        let mut handler = None;

        let reply = match (self.service, operation) {
            (Service::Email, "create") => format!(
                "Creating email with {} and layout {}",
                self.arg_or("text", ""),
                self.arg_or("layoutPrompt", "")
            ),
            (Service::Email, "send") => {
                format!("Sending email to {}", self.arg_or("recipients", "recipients"))
            }
            (Service::Email, "list") => format!(
                "Listing emails for workspace {}",
                self.arg_or("workspace", "current workspace")
            ),
            (Service::Email, "reply") => {
                let name = reply_handler(self.arg("message"));
                handler = Some(name.to_string());
                format!("Replying to email message. Handled by: {}", name)
            }
            (Service::Monarch, "getAppVersion") => "Retrieving latest Monarch app version.".into(),
            (Service::Monarch, "syncWeeklyContent") => {
                "Syncing weekly content for the Monarch app.".into()
            }
            (Service::Monarch, "generateWorkoutPlan") => "Generating workout plan with Gigi.".into(),
            (Service::Monarch, "resetWorkoutPlan") => "Resetting workout plan.".into(),
            (Service::Monarch, "moderateCommunity") => "Moderating community content.".into(),
            (Service::Monarch, "updateUI") => "Updating UI elements in the Monarch app.".into(),
            (Service::Affiliate, "getNetworks") => "Retrieving affiliate networks.".into(),
            (Service::Affiliate, "getProducts") => "Retrieving affiliate products.".into(),
            (Service::Affiliate, "getLinks") => "Retrieving affiliate links.".into(),
            (Service::Affiliate, "getEarnings") => "Retrieving affiliate earnings.".into(),
            (Service::Affiliate, "getStatistics") => "Retrieving affiliate statistics.".into(),
            (Service::Affiliate, "createLink") => "Creating affiliate link.".into(),
            (Service::Trading, "getStrategies") => "Retrieving trading strategies.".into(),
            (Service::Trading, "activateStrategy") => "Activating trading strategy.".into(),
            (Service::Trading, "deactivateStrategy") => "Deactivating trading strategy.".into(),
            (Service::Trading, "getTrades") => "Retrieving trading history.".into(),
            (Service::Trading, "getStatistics") => "Retrieving trading statistics.".into(),
            (Service::System, "test") => "Running full system integrity test.".into(),
            (Service::System, "verify") => "Verifying system integrity.".into(),
            (service, op) => {
                tracing::warn!(%service, operation = op, "Service operation has no reply");
                return None;
            }
        };

        let action = Action::service_call(self.service, operation, self.args.clone(), handler);
        Some(CommandResponse::with_action(reply, action))
    }

    /// Argument value by key, ignoring the case the key was typed in.
    fn arg(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    fn arg_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.arg(key).unwrap_or(default)
    }
}

/// Split `key: value, key: value` into a map. Trailing `)` are dropped and
/// fragments without a `:` are ignored.
fn parse_args(raw: &str) -> CallArgs {
    let raw = raw.trim_end().trim_end_matches(')');
    raw.split(',')
        .filter_map(|pair| pair.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

/// Customer-facing messages are routed to the dedicated responder.
fn reply_handler(message: Option<&str>) -> &'static str {
    match message {
        Some(m) if m.to_lowercase().contains("customer") => CUSTOMER_HANDLER,
        _ => DEFAULT_HANDLER,
    }
}
