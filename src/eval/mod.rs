//! Rule evaluation: applying a condition tree to a change-request context
//! and classifying a change request against an ordered rule list.

pub mod context;

pub use context::ChangeContext;

use serde::Serialize;

use crate::model::{BoolOperator, Condition, Node, Operator, RiskDetectRule, Value};

/// The outcome of classifying a change request: which rule fired, which
/// risk level it binds to, and a human-readable trace of why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMatch {
    pub rule_id: u64,
    pub risk_level_id: u64,
    pub reason: String,
}

/// Evaluate a rule tree against a context. Groups combine children with
/// AND/OR; nesting is handled recursively.
pub fn matches(node: &Node, ctx: &ChangeContext) -> bool {
    match node {
        Node::Condition(c) => condition_matches(c, ctx),
        Node::Group(g) => match g.boolean_operator {
            BoolOperator::And => g.children.iter().all(|n| matches(n, ctx)),
            BoolOperator::Or => g.children.iter().any(|n| matches(n, ctx)),
        },
    }
}

/// Leaf semantics. An absent context attribute fails the positive
/// operators and satisfies their negations, keeping each NOT_* a strict
/// complement of its counterpart.
fn condition_matches(condition: &Condition, ctx: &ChangeContext) -> bool {
    let Some(actual) = ctx.attribute(condition.expression) else {
        return matches!(
            condition.operator,
            Operator::NotEquals | Operator::NotContains | Operator::NotIn
        );
    };
    let tokens = condition.value.tokens();
    match condition.operator {
        Operator::Equals => tokens.first().is_some_and(|t| *t == actual),
        Operator::NotEquals => !tokens.first().is_some_and(|t| *t == actual),
        Operator::Contains => tokens.first().is_some_and(|t| actual.contains(*t)),
        Operator::NotContains => !tokens.first().is_some_and(|t| actual.contains(*t)),
        Operator::In => tokens.iter().any(|t| *t == actual),
        Operator::NotIn => !tokens.iter().any(|t| *t == actual),
    }
}

/// Classify a change request against rules ordered highest severity
/// first. The first matching rule wins; `None` means no rule applies and
/// the platform's default risk level holds.
pub fn classify(rules: &[RiskDetectRule], ctx: &ChangeContext) -> Option<RuleMatch> {
    for rule in rules {
        if matches(&rule.root_node, ctx) {
            let label = rule.name.as_deref().unwrap_or("unnamed rule");
            let reason = format!("{label}: {}", describe(&rule.root_node));
            log::info!(
                "rule {} matched for risk level {}: {reason}",
                rule.id,
                rule.risk_level_id,
            );
            return Some(RuleMatch {
                rule_id: rule.id,
                risk_level_id: rule.risk_level_id,
                reason,
            });
        }
    }
    log::debug!("no rule matched; default risk level applies");
    None
}

/// Render a tree as a readable predicate, e.g.
/// `(environmentId EQUALS "3" AND taskType IN ["IMPORT", "EXPORT"])`.
pub fn describe(node: &Node) -> String {
    match node {
        Node::Condition(c) => format!(
            "{} {} {}",
            c.expression.attribute(),
            c.operator,
            format_value(&c.value)
        ),
        Node::Group(g) => {
            let parts: Vec<String> = g.children.iter().map(describe).collect();
            format!("({})", parts.join(&format!(" {} ", g.boolean_operator)))
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::One(s) => format!("{s:?}"),
        Value::Many(v) => {
            let parts: Vec<String> = v.iter().map(|s| format!("{s:?}")).collect();
            format!("[{}]", parts.join(", "))
        }
    }
}
