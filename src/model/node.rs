use serde::{Deserialize, Serialize};
use std::fmt;

/// The change-request attribute a condition inspects.
///
/// Wire names are PascalCase, matching the platform's rule documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expression {
    EnvironmentId,
    ProjectName,
    DatabaseName,
    TaskType,
    SqlCheckResult,
}

impl Expression {
    /// The camelCase attribute name used in reason traces and context lookups.
    pub fn attribute(self) -> &'static str {
        match self {
            Expression::EnvironmentId => "environmentId",
            Expression::ProjectName => "projectName",
            Expression::DatabaseName => "databaseName",
            Expression::TaskType => "taskType",
            Expression::SqlCheckResult => "sqlCheckResult",
        }
    }

    /// Whether condition values for this expression come from a closed
    /// catalog (environments, task types, check results) or are freeform
    /// text (project and database names).
    pub fn is_freeform(self) -> bool {
        matches!(self, Expression::ProjectName | Expression::DatabaseName)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// Comparison operator applied by a condition.
///
/// `In`/`NotIn` take a multi-valued right-hand side; all others take a
/// single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    In,
    NotIn,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "EQUALS",
            Operator::NotEquals => "NOT_EQUALS",
            Operator::Contains => "CONTAINS",
            Operator::NotContains => "NOT_CONTAINS",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
        }
    }

    /// True for operators whose right-hand side is a value list.
    pub fn is_multi(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AND/OR combinator for a condition group's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoolOperator {
    And,
    Or,
}

impl BoolOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BoolOperator::And => "AND",
            BoolOperator::Or => "OR",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            BoolOperator::And => BoolOperator::Or,
            BoolOperator::Or => BoolOperator::And,
        }
    }
}

impl fmt::Display for BoolOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A condition's right-hand side: a scalar string or a string list,
/// depending on the operator. Untagged on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    One(String),
    Many(Vec<String>),
}

impl Value {
    pub fn is_many(&self) -> bool {
        matches!(self, Value::Many(_))
    }

    /// All tokens, regardless of shape. A scalar yields one token.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Value::One(s) => vec![s.as_str()],
            Value::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Value::One(s) => s.is_empty(),
            Value::Many(v) => v.is_empty(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::One(s.to_string())
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::Many(v.into_iter().map(str::to_string).collect())
    }
}

/// A leaf predicate over one change-request attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub expression: Expression,
    pub operator: Operator,
    pub value: Value,
}

/// An internal node combining children under AND/OR.
///
/// Children are full nodes, so the wire grammar admits nested groups;
/// the editor restricts trees it produces to one group level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionGroup {
    pub boolean_operator: BoolOperator,
    pub children: Vec<Node>,
}

/// A rule-tree node, discriminated on the wire by the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    #[serde(rename = "CONDITION")]
    Condition(Condition),
    #[serde(rename = "CONDITION_GROUP")]
    Group(ConditionGroup),
}

impl Node {
    /// Number of leaf conditions in the tree.
    pub fn condition_count(&self) -> usize {
        match self {
            Node::Condition(_) => 1,
            Node::Group(g) => g.children.iter().map(Node::condition_count).sum(),
        }
    }

    /// Maximum group nesting depth: a bare condition is 0, a flat group 1.
    pub fn depth(&self) -> usize {
        match self {
            Node::Condition(_) => 0,
            Node::Group(g) => 1 + g.children.iter().map(Node::depth).max().unwrap_or(0),
        }
    }
}

/// Who created a rule; display-only metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
}

/// Rule creation time as the platform persists it: epoch millis or an
/// ISO-8601 string. Display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreateTime {
    Millis(u64),
    Iso(String),
}

/// A persisted risk-detection rule document, bound 1:1 to a risk level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDetectRule {
    pub id: u64,
    pub risk_level_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub root_node: Node,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<CreateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env_equals_3() -> Node {
        Node::Condition(Condition {
            expression: Expression::EnvironmentId,
            operator: Operator::Equals,
            value: Value::from("3"),
        })
    }

    #[test]
    fn condition_wire_shape() {
        let node = env_equals_3();
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "type": "CONDITION",
                "expression": "EnvironmentId",
                "operator": "EQUALS",
                "value": "3",
            })
        );
    }

    #[test]
    fn group_wire_shape() {
        let node = Node::Group(ConditionGroup {
            boolean_operator: BoolOperator::Or,
            children: vec![
                env_equals_3(),
                Node::Condition(Condition {
                    expression: Expression::ProjectName,
                    operator: Operator::In,
                    value: Value::from(vec!["proj-a", "proj-b"]),
                }),
            ],
        });
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "type": "CONDITION_GROUP",
                "booleanOperator": "OR",
                "children": [
                    {
                        "type": "CONDITION",
                        "expression": "EnvironmentId",
                        "operator": "EQUALS",
                        "value": "3",
                    },
                    {
                        "type": "CONDITION",
                        "expression": "ProjectName",
                        "operator": "IN",
                        "value": ["proj-a", "proj-b"],
                    },
                ],
            })
        );
    }

    #[test]
    fn node_round_trips() {
        let node = Node::Group(ConditionGroup {
            boolean_operator: BoolOperator::And,
            children: vec![env_equals_3()],
        });
        let text = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&text).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn nested_group_parses() {
        let doc = json!({
            "type": "CONDITION_GROUP",
            "booleanOperator": "AND",
            "children": [{
                "type": "CONDITION_GROUP",
                "booleanOperator": "OR",
                "children": [{
                    "type": "CONDITION",
                    "expression": "TaskType",
                    "operator": "EQUALS",
                    "value": "IMPORT",
                }],
            }],
        });
        let node: Node = serde_json::from_value(doc).unwrap();
        assert_eq!(node.depth(), 2);
        assert_eq!(node.condition_count(), 1);
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let doc = json!({
            "type": "CONDITION_TREE",
            "expression": "TaskType",
            "operator": "EQUALS",
            "value": "IMPORT",
        });
        assert!(serde_json::from_value::<Node>(doc).is_err());
    }

    #[test]
    fn rule_document_wire_shape() {
        let rule = RiskDetectRule {
            id: 12,
            risk_level_id: 4,
            name: Some("prod changes".into()),
            root_node: env_equals_3(),
            creator: Some(Creator { name: "admin".into() }),
            create_time: Some(CreateTime::Millis(1_700_000_000_000)),
        };
        let doc = serde_json::to_value(&rule).unwrap();
        assert_eq!(doc["riskLevelId"], 4);
        assert_eq!(doc["rootNode"]["type"], "CONDITION");
        assert_eq!(doc["creator"]["name"], "admin");
        assert_eq!(doc["createTime"], 1_700_000_000_000u64);
    }

    #[test]
    fn rule_document_optional_fields_default() {
        let rule: RiskDetectRule = serde_json::from_value(json!({
            "id": 1,
            "riskLevelId": 2,
            "rootNode": {
                "type": "CONDITION",
                "expression": "DatabaseName",
                "operator": "CONTAINS",
                "value": "_test",
            },
        }))
        .unwrap();
        assert!(rule.name.is_none());
        assert!(rule.creator.is_none());
        assert!(rule.create_time.is_none());
    }

    #[test]
    fn iso_create_time_parses() {
        let t: CreateTime = serde_json::from_value(json!("2024-06-01T12:00:00Z")).unwrap();
        assert_eq!(t, CreateTime::Iso("2024-06-01T12:00:00Z".into()));
    }

    #[test]
    fn operator_toggle_and_multiplicity() {
        assert!(Operator::In.is_multi());
        assert!(Operator::NotIn.is_multi());
        assert!(!Operator::Equals.is_multi());
        assert_eq!(BoolOperator::And.toggled(), BoolOperator::Or);
        assert_eq!(BoolOperator::Or.toggled(), BoolOperator::And);
    }
}
