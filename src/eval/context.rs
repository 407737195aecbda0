use serde::{Deserialize, Serialize};

use crate::model::Expression;

/// The candidate change-request attributes a rule tree is evaluated
/// against. Every attribute is optional: a change request may not carry a
/// SQL-check outcome yet, or may not target a specific database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeContext {
    pub environment_id: Option<String>,
    pub project_name: Option<String>,
    pub database_name: Option<String>,
    pub task_type: Option<String>,
    pub sql_check_result: Option<String>,
}

impl ChangeContext {
    /// Look up the attribute a condition's expression inspects.
    pub fn attribute(&self, expression: Expression) -> Option<&str> {
        let field = match expression {
            Expression::EnvironmentId => &self.environment_id,
            Expression::ProjectName => &self.project_name,
            Expression::DatabaseName => &self.database_name,
            Expression::TaskType => &self.task_type,
            Expression::SqlCheckResult => &self.sql_check_result,
        };
        field.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_lookup_covers_every_expression() {
        let ctx = ChangeContext {
            environment_id: Some("3".into()),
            project_name: Some("billing".into()),
            database_name: None,
            task_type: Some("IMPORT".into()),
            sql_check_result: None,
        };
        assert_eq!(ctx.attribute(Expression::EnvironmentId), Some("3"));
        assert_eq!(ctx.attribute(Expression::ProjectName), Some("billing"));
        assert_eq!(ctx.attribute(Expression::DatabaseName), None);
        assert_eq!(ctx.attribute(Expression::TaskType), Some("IMPORT"));
        assert_eq!(ctx.attribute(Expression::SqlCheckResult), None);
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let ctx: ChangeContext =
            serde_json::from_str(r#"{"environmentId": "4", "taskType": "ASYNC"}"#).unwrap();
        assert_eq!(ctx.environment_id.as_deref(), Some("4"));
        assert_eq!(ctx.task_type.as_deref(), Some("ASYNC"));
        assert_eq!(ctx.project_name, None);
    }
}
