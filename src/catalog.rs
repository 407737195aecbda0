//! Read-only value catalogs consumed by the editor and read-only views:
//! environments, task types, and SQL-check results. The engine only needs
//! `{code, label}` pairs plus a reverse map for rendering persisted codes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::model::{Expression, Value};

/// Which catalog a select widget draws its options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Environments,
    TaskTypes,
    CheckResults,
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub code: String,
    pub label: String,
}

/// An ordered option list with code→label and label→code lookup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_code: HashMap<String, usize>,
    by_label: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut by_code = HashMap::with_capacity(entries.len());
        let mut by_label = HashMap::with_capacity(entries.len());
        for (i, e) in entries.iter().enumerate() {
            by_code.insert(e.code.clone(), i);
            by_label.insert(e.label.clone(), i);
        }
        Self { entries, by_code, by_label }
    }

    /// The options, in configuration order. Empty when the catalog failed
    /// to load; the editor degrades to an empty dropdown.
    pub fn options(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn label_of(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(|&i| self.entries[i].label.as_str())
    }

    pub fn code_of(&self, label: &str) -> Option<&str> {
        self.by_label.get(label).map(|&i| self.entries[i].code.as_str())
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }
}

/// The three catalogs the rule editor consumes.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    environments: Catalog,
    task_types: Catalog,
    check_results: Catalog,
}

impl Catalogs {
    pub fn from_config(config: &Config) -> Self {
        Self {
            environments: Catalog::from_entries(config.catalogs.environments.clone()),
            task_types: Catalog::from_entries(config.catalogs.task_types.clone()),
            check_results: Catalog::from_entries(config.catalogs.check_results.clone()),
        }
    }

    pub fn get(&self, kind: CatalogKind) -> &Catalog {
        match kind {
            CatalogKind::Environments => &self.environments,
            CatalogKind::TaskTypes => &self.task_types,
            CatalogKind::CheckResults => &self.check_results,
        }
    }

    /// The catalog backing an expression's value, if any. Project and
    /// database names are freeform.
    pub fn for_expression(&self, expression: Expression) -> Option<&Catalog> {
        let kind = match expression {
            Expression::EnvironmentId => CatalogKind::Environments,
            Expression::TaskType => CatalogKind::TaskTypes,
            Expression::SqlCheckResult => CatalogKind::CheckResults,
            Expression::ProjectName | Expression::DatabaseName => return None,
        };
        Some(self.get(kind))
    }

    /// Render a stored value for read-only views: catalog codes map back
    /// to labels (unknown codes fall back to the raw code), freeform
    /// values render as entered. Lists join with a comma.
    pub fn display_value(&self, expression: Expression, value: &Value) -> String {
        let render = |token: &str| -> String {
            self.for_expression(expression)
                .and_then(|c| c.label_of(token))
                .unwrap_or(token)
                .to_string()
        };
        let parts: Vec<String> = value.tokens().into_iter().map(render).collect();
        parts.join(", ")
    }
}
