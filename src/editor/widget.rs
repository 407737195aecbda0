use crate::catalog::CatalogKind;
use crate::model::{Expression, Operator};

/// The input widget a condition's value field should render as, derived
/// from its expression and the operator's multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueWidget {
    /// Closed single choice over a catalog.
    SingleSelect(CatalogKind),
    /// Closed multi choice over a catalog (IN / NOT_IN).
    MultiSelect(CatalogKind),
    /// Freeform text (project/database names, single-valued operators).
    FreeText,
    /// Freeform user-typed tags (project/database names under IN / NOT_IN).
    TagInput,
}

/// Resolve the value widget for an expression and (possibly unset)
/// operator. An unset operator is treated as single-valued.
pub fn widget_for(expression: Expression, operator: Option<Operator>) -> ValueWidget {
    let multi = operator.is_some_and(Operator::is_multi);
    match expression {
        Expression::EnvironmentId => catalog_widget(CatalogKind::Environments, multi),
        Expression::TaskType => catalog_widget(CatalogKind::TaskTypes, multi),
        Expression::SqlCheckResult => catalog_widget(CatalogKind::CheckResults, multi),
        Expression::ProjectName | Expression::DatabaseName => {
            if multi {
                ValueWidget::TagInput
            } else {
                ValueWidget::FreeText
            }
        }
    }
}

fn catalog_widget(kind: CatalogKind, multi: bool) -> ValueWidget {
    if multi {
        ValueWidget::MultiSelect(kind)
    } else {
        ValueWidget::SingleSelect(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_expressions_select() {
        assert_eq!(
            widget_for(Expression::EnvironmentId, Some(Operator::Equals)),
            ValueWidget::SingleSelect(CatalogKind::Environments)
        );
        assert_eq!(
            widget_for(Expression::TaskType, Some(Operator::NotIn)),
            ValueWidget::MultiSelect(CatalogKind::TaskTypes)
        );
        assert_eq!(
            widget_for(Expression::SqlCheckResult, Some(Operator::In)),
            ValueWidget::MultiSelect(CatalogKind::CheckResults)
        );
    }

    #[test]
    fn freeform_expressions_use_text_or_tags() {
        assert_eq!(
            widget_for(Expression::ProjectName, Some(Operator::Contains)),
            ValueWidget::FreeText
        );
        assert_eq!(
            widget_for(Expression::ProjectName, Some(Operator::In)),
            ValueWidget::TagInput
        );
        assert_eq!(
            widget_for(Expression::DatabaseName, Some(Operator::NotIn)),
            ValueWidget::TagInput
        );
    }

    #[test]
    fn unset_operator_defaults_to_single() {
        assert_eq!(
            widget_for(Expression::EnvironmentId, None),
            ValueWidget::SingleSelect(CatalogKind::Environments)
        );
        assert_eq!(widget_for(Expression::DatabaseName, None), ValueWidget::FreeText);
    }
}
