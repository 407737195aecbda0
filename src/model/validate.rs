//! Validation for rule trees and editor drafts.
//!
//! Errors are data, not exceptions: callers collect the full list and
//! surface each entry next to the offending field. Nothing here panics.

use thiserror::Error;

use super::node::{Condition, ConditionGroup, Node, Operator, RiskDetectRule};

/// A single field-level problem, addressed by a wire-style path such as
/// `rootNode.children[1]` (persisted trees) or `items[0].children[2]`
/// (editor drafts).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{path}: expression is required")]
    MissingExpression { path: String },
    #[error("{path}: operator is required")]
    MissingOperator { path: String },
    #[error("{path}: value is required")]
    MissingValue { path: String },
    #[error("{path}: value must not be blank")]
    BlankValue { path: String },
    #[error("{path}: operator {operator} expects a {expected} value")]
    ValueShape {
        path: String,
        operator: Operator,
        expected: &'static str,
    },
    #[error("{path}: a condition group must keep at least one child")]
    EmptyGroup { path: String },
}

impl ValidationError {
    /// The field path the error is attached to.
    pub fn path(&self) -> &str {
        match self {
            ValidationError::MissingExpression { path }
            | ValidationError::MissingOperator { path }
            | ValidationError::MissingValue { path }
            | ValidationError::BlankValue { path }
            | ValidationError::ValueShape { path, .. }
            | ValidationError::EmptyGroup { path } => path,
        }
    }
}

/// Validate a complete persisted tree. Returns every problem found, in
/// traversal order; an empty vec means the tree is well-formed.
pub fn validate_root(root: &Node) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    validate_node(root, "rootNode", &mut errors);
    errors
}

/// Validate a full rule document (its tree; ids are platform-assigned).
pub fn validate_rule(rule: &RiskDetectRule) -> Vec<ValidationError> {
    validate_root(&rule.root_node)
}

fn validate_node(node: &Node, path: &str, errors: &mut Vec<ValidationError>) {
    match node {
        Node::Condition(c) => validate_condition(c, path, errors),
        Node::Group(g) => validate_group(g, path, errors),
    }
}

fn validate_group(group: &ConditionGroup, path: &str, errors: &mut Vec<ValidationError>) {
    if group.children.is_empty() {
        errors.push(ValidationError::EmptyGroup { path: path.to_string() });
        return;
    }
    for (i, child) in group.children.iter().enumerate() {
        validate_node(child, &format!("{path}.children[{i}]"), errors);
    }
}

/// Checks on a complete condition: non-empty, no whitespace-only tokens,
/// and value shape matching the operator's multiplicity.
pub(crate) fn validate_condition(
    condition: &Condition,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    let value = &condition.value;
    if value.is_empty() {
        errors.push(ValidationError::MissingValue { path: path.to_string() });
        return;
    }
    if value.tokens().iter().any(|t| t.trim().is_empty()) {
        errors.push(ValidationError::BlankValue { path: path.to_string() });
    }
    if condition.operator.is_multi() != value.is_many() {
        errors.push(ValidationError::ValueShape {
            path: path.to_string(),
            operator: condition.operator,
            expected: if condition.operator.is_multi() { "list" } else { "single" },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::{BoolOperator, Expression, Value};

    fn cond(operator: Operator, value: Value) -> Condition {
        Condition {
            expression: Expression::ProjectName,
            operator,
            value,
        }
    }

    #[test]
    fn well_formed_tree_passes() {
        let root = Node::Group(ConditionGroup {
            boolean_operator: BoolOperator::And,
            children: vec![
                Node::Condition(cond(Operator::Equals, Value::from("orders"))),
                Node::Condition(cond(Operator::In, Value::from(vec!["a", "b"]))),
            ],
        });
        assert!(validate_root(&root).is_empty());
    }

    #[test]
    fn empty_scalar_is_missing_value() {
        let root = Node::Condition(cond(Operator::Equals, Value::from("")));
        let errors = validate_root(&root);
        assert_eq!(
            errors,
            vec![ValidationError::MissingValue { path: "rootNode".into() }]
        );
    }

    #[test]
    fn whitespace_token_is_blank() {
        let root = Node::Condition(cond(Operator::In, Value::from(vec!["ok", "   "])));
        let errors = validate_root(&root);
        assert!(matches!(errors[0], ValidationError::BlankValue { .. }));
    }

    #[test]
    fn scalar_under_in_is_shape_error() {
        let root = Node::Condition(cond(Operator::In, Value::from("solo")));
        let errors = validate_root(&root);
        assert_eq!(
            errors,
            vec![ValidationError::ValueShape {
                path: "rootNode".into(),
                operator: Operator::In,
                expected: "list",
            }]
        );
    }

    #[test]
    fn list_under_equals_is_shape_error() {
        let root = Node::Condition(cond(Operator::Equals, Value::from(vec!["a", "b"])));
        let errors = validate_root(&root);
        assert!(matches!(errors[0], ValidationError::ValueShape { expected: "single", .. }));
    }

    #[test]
    fn empty_group_is_rejected_with_child_path() {
        let root = Node::Group(ConditionGroup {
            boolean_operator: BoolOperator::Or,
            children: vec![Node::Group(ConditionGroup {
                boolean_operator: BoolOperator::And,
                children: vec![],
            })],
        });
        let errors = validate_root(&root);
        assert_eq!(
            errors,
            vec![ValidationError::EmptyGroup { path: "rootNode.children[0]".into() }]
        );
    }

    #[test]
    fn error_path_accessor() {
        let err = ValidationError::BlankValue { path: "items[2]".into() };
        assert_eq!(err.path(), "items[2]");
        assert_eq!(err.to_string(), "items[2]: value must not be blank");
    }
}
