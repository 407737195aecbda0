//! risk-rules CLI: classify a change request against a rule set, or
//! validate a rule document.
//!
//! Default mode reads JSON from stdin:
//!
//! ```json
//! {"rules": [ ...RiskDetectRule... ], "context": { "environmentId": "4" }}
//! ```
//!
//! and writes the classification to stdout:
//!
//! ```json
//! {"riskLevelId": 4, "ruleId": 12, "reason": "..."}
//! ```
//!
//! `--validate` instead reads a single rule document and reports field
//! errors (exit code 1 when any are found). Unknown catalog codes are
//! warnings, not errors: catalogs are deployment-configurable.

use std::io::Read;

use serde::Deserialize;

use risk_rules::catalog::Catalogs;
use risk_rules::config::Config;
use risk_rules::eval::{ChangeContext, classify};
use risk_rules::logging::{self, LevelFilter};
use risk_rules::model::{Node, RiskDetectRule, validate_rule};

#[derive(Deserialize)]
struct ClassifyInput {
    rules: Vec<RiskDetectRule>,
    #[serde(default)]
    context: ChangeContext,
}

fn read_stdin() -> String {
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("failed to read stdin");
        std::process::exit(1);
    }
    input
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let validate_mode = args.iter().any(|a| a == "--validate");
    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    if let Some(unknown) = args
        .iter()
        .find(|a| !matches!(a.as_str(), "--validate" | "-v" | "--verbose"))
    {
        eprintln!("unknown argument: {unknown}");
        eprintln!("usage: risk-rules [--validate] [-v]");
        std::process::exit(2);
    }

    let config = Config::load();
    logging::init(
        if verbose { LevelFilter::Debug } else { LevelFilter::Warn },
        config.settings.audit_log,
    );

    let input = read_stdin();
    if validate_mode {
        validate(&input, &config);
    } else {
        run_classify(&input);
    }
}

fn run_classify(input: &str) {
    let parsed: ClassifyInput = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("JSON parse error: {e}");
            std::process::exit(1);
        }
    };

    let output = match classify(&parsed.rules, &parsed.context) {
        Some(m) => serde_json::json!({
            "riskLevelId": m.risk_level_id,
            "ruleId": m.rule_id,
            "reason": m.reason,
        }),
        None => serde_json::json!({
            "riskLevelId": null,
            "ruleId": null,
            "reason": "no rule matched",
        }),
    };
    println!("{output}");
}

fn validate(input: &str, config: &Config) {
    let rule: RiskDetectRule = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("JSON parse error: {e}");
            std::process::exit(1);
        }
    };

    for warning in unknown_catalog_codes(&rule.root_node, &Catalogs::from_config(config)) {
        eprintln!("warning: {warning}");
    }

    let errors = validate_rule(&rule);
    if errors.is_empty() {
        println!("{}", serde_json::json!({ "valid": true }));
        return;
    }
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    println!("{}", serde_json::json!({ "valid": false, "errors": messages }));
    std::process::exit(1);
}

/// Collect catalog-backed condition values that name codes absent from
/// the configured catalogs.
fn unknown_catalog_codes(node: &Node, catalogs: &Catalogs) -> Vec<String> {
    let mut warnings = Vec::new();
    collect_unknown_codes(node, catalogs, &mut warnings);
    warnings
}

fn collect_unknown_codes(node: &Node, catalogs: &Catalogs, warnings: &mut Vec<String>) {
    match node {
        Node::Condition(c) => {
            let Some(catalog) = catalogs.for_expression(c.expression) else {
                return;
            };
            if catalog.is_empty() {
                return;
            }
            for token in c.value.tokens() {
                if !catalog.contains_code(token) {
                    warnings.push(format!(
                        "{} value {token:?} is not a configured catalog code",
                        c.expression.attribute(),
                    ));
                }
            }
        }
        Node::Group(g) => {
            for child in &g.children {
                collect_unknown_codes(child, catalogs, warnings);
            }
        }
    }
}
