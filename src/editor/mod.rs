//! In-progress rule editing: drafts, two-level addressing, and the
//! serialize/load pair that bridges drafts to the wire tree.
//!
//! The editor holds a flat list of top-level items (bare conditions or
//! one-level groups) addressed by [`NodePath`]. Mutations are infallible;
//! paths that no longer exist are ignored, since the caller's indices are
//! authoritative. Completeness is checked only at [`TreeEditor::serialize`],
//! which returns field errors as data.

pub mod widget;

pub use widget::{ValueWidget, widget_for};

use std::fmt;

use thiserror::Error;

use crate::model::validate::validate_condition;
use crate::model::{
    BoolOperator, Condition, ConditionGroup, Expression, Node, Operator, ValidationError, Value,
};

/// Address of a draft condition: a top-level item, optionally a child
/// within that item's group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePath {
    pub item: usize,
    pub child: Option<usize>,
}

impl NodePath {
    pub fn top(item: usize) -> Self {
        Self { item, child: None }
    }

    pub fn nested(item: usize, child: usize) -> Self {
        Self { item, child: Some(child) }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.child {
            Some(c) => write!(f, "items[{}].children[{c}]", self.item),
            None => write!(f, "items[{}]", self.item),
        }
    }
}

/// A condition under construction. Fields stay unset until the user picks
/// them; `initialized` is false only for conditions populated from a
/// persisted record, so the first expression/operator change can preserve
/// the stored value instead of clearing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionDraft {
    pub expression: Option<Expression>,
    pub operator: Option<Operator>,
    pub value: Option<Value>,
    initialized: bool,
}

impl ConditionDraft {
    fn new() -> Self {
        Self {
            expression: None,
            operator: None,
            value: None,
            initialized: true,
        }
    }

    fn from_wire(condition: &Condition) -> Self {
        Self {
            expression: Some(condition.expression),
            operator: Some(condition.operator),
            value: Some(condition.value.clone()),
            initialized: false,
        }
    }

    /// The value widget this draft should render, once an expression is set.
    pub fn widget(&self) -> Option<ValueWidget> {
        self.expression.map(|e| widget_for(e, self.operator))
    }

    fn build(&self) -> Option<Condition> {
        Some(Condition {
            expression: self.expression?,
            operator: self.operator?,
            value: self.value.clone()?,
        })
    }
}

impl Default for ConditionDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// A one-level group of condition drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDraft {
    pub boolean_operator: BoolOperator,
    pub children: Vec<ConditionDraft>,
}

/// A top-level editor item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorItem {
    Condition(ConditionDraft),
    Group(GroupDraft),
}

/// A persisted tree the editor cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("condition groups nested deeper than one level cannot be edited")]
    TooDeep,
}

/// The editor state machine. One instance edits one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeEditor {
    items: Vec<EditorItem>,
    root_operator: Option<BoolOperator>,
    show_condition_group: bool,
}

impl TreeEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[EditorItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the root-level AND/OR toggle is visible (two or more
    /// top-level items).
    pub fn show_condition_group(&self) -> bool {
        self.show_condition_group
    }

    /// The root combinator; defaults to AND once the root is promoted.
    pub fn root_operator(&self) -> BoolOperator {
        self.root_operator.unwrap_or(BoolOperator::And)
    }

    pub fn condition(&self, path: NodePath) -> Option<&ConditionDraft> {
        match (self.items.get(path.item), path.child) {
            (Some(EditorItem::Condition(d)), None) => Some(d),
            (Some(EditorItem::Group(g)), Some(c)) => g.children.get(c),
            _ => None,
        }
    }

    fn condition_mut(&mut self, path: NodePath) -> Option<&mut ConditionDraft> {
        match (self.items.get_mut(path.item), path.child) {
            (Some(EditorItem::Condition(d)), None) => Some(d),
            (Some(EditorItem::Group(g)), Some(c)) => g.children.get_mut(c),
            _ => None,
        }
    }

    fn refresh_show_flag(&mut self) {
        self.show_condition_group = self.items.len() >= 2;
    }

    /// Append an empty condition at the root, or inside the group at
    /// `group_index`. Root auto-promotes to a group at two items.
    pub fn add_condition(&mut self, group_index: Option<usize>) {
        match group_index {
            Some(i) => {
                if let Some(EditorItem::Group(g)) = self.items.get_mut(i) {
                    g.children.push(ConditionDraft::new());
                }
            }
            None => self.items.push(EditorItem::Condition(ConditionDraft::new())),
        }
        self.refresh_show_flag();
    }

    /// Append a new group seeded with one empty condition.
    pub fn add_group(&mut self) {
        self.items.push(EditorItem::Group(GroupDraft {
            boolean_operator: BoolOperator::And,
            children: vec![ConditionDraft::new()],
        }));
        self.refresh_show_flag();
    }

    /// Remove the condition at `path`. A group whose last child is removed
    /// disappears with it; dropping to zero items hides the root toggle.
    pub fn remove_condition(&mut self, path: NodePath) {
        match path.child {
            Some(c) => {
                if let Some(EditorItem::Group(g)) = self.items.get_mut(path.item) {
                    if c < g.children.len() {
                        g.children.remove(c);
                    }
                    if g.children.is_empty() {
                        self.items.remove(path.item);
                    }
                }
            }
            None => {
                if path.item < self.items.len() {
                    self.items.remove(path.item);
                }
            }
        }
        self.refresh_show_flag();
    }

    /// Flip the AND/OR combinator of the group at `index`.
    pub fn toggle_group_operator(&mut self, index: usize) {
        if let Some(EditorItem::Group(g)) = self.items.get_mut(index) {
            g.boolean_operator = g.boolean_operator.toggled();
        }
    }

    /// Flip the root-level combinator.
    pub fn toggle_root_operator(&mut self) {
        self.root_operator = Some(self.root_operator().toggled());
    }

    /// Set a condition's expression. The legal value domain changes with
    /// the expression, so the value is cleared — except the first touch of
    /// a condition loaded from a persisted record, which must keep the
    /// stored value.
    pub fn set_expression(&mut self, path: NodePath, expression: Expression) {
        let Some(draft) = self.condition_mut(path) else {
            return;
        };
        draft.expression = Some(expression);
        if draft.initialized {
            draft.value = None;
        } else {
            draft.initialized = true;
        }
    }

    /// Set a condition's operator. The value is cleared only when the
    /// operator's multiplicity (single vs. list) changes, with the same
    /// first-touch exception as [`set_expression`](Self::set_expression).
    pub fn set_operator(&mut self, path: NodePath, operator: Operator) {
        let Some(draft) = self.condition_mut(path) else {
            return;
        };
        let multiplicity_changed =
            draft.operator.is_some_and(|old| old.is_multi() != operator.is_multi());
        draft.operator = Some(operator);
        if multiplicity_changed {
            if draft.initialized {
                draft.value = None;
            } else {
                draft.initialized = true;
            }
        }
    }

    /// Set a condition's value as entered through its widget.
    pub fn set_value(&mut self, path: NodePath, value: Value) {
        if let Some(draft) = self.condition_mut(path) {
            draft.value = Some(value);
        }
    }

    /// Reset to the empty state (after a successful save, or on cancel).
    pub fn clear(&mut self) {
        self.items.clear();
        self.root_operator = None;
        self.show_condition_group = false;
    }

    /// Convert drafts to the wire tree.
    ///
    /// Returns `Ok(None)` for an empty editor (submit is a no-op), the
    /// flattened bare condition when exactly one top-level condition
    /// exists, or the root group otherwise. Incomplete or malformed drafts
    /// yield the full error list instead.
    pub fn serialize(&self) -> Result<Option<Node>, Vec<ValidationError>> {
        let mut errors = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            match item {
                EditorItem::Condition(d) => validate_draft(d, NodePath::top(i), &mut errors),
                EditorItem::Group(g) => {
                    for (c, d) in g.children.iter().enumerate() {
                        validate_draft(d, NodePath::nested(i, c), &mut errors);
                    }
                }
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let mut nodes: Vec<Node> = self.items.iter().filter_map(item_to_node).collect();
        Ok(match nodes.len() {
            0 => None,
            1 => Some(nodes.remove(0)),
            _ => Some(Node::Group(ConditionGroup {
                boolean_operator: self.root_operator(),
                children: nodes,
            })),
        })
    }

    /// Populate the editor from a persisted tree, replacing any current
    /// state. Derives the root-toggle visibility from whether the tree is
    /// a multi-child group and arms the first-touch value guard on every
    /// loaded condition.
    pub fn load(&mut self, root: &Node) -> Result<(), LoadError> {
        let (items, root_operator) = match root {
            Node::Condition(c) => {
                (vec![EditorItem::Condition(ConditionDraft::from_wire(c))], None)
            }
            Node::Group(g) => {
                let mut items = Vec::with_capacity(g.children.len());
                for child in &g.children {
                    items.push(item_from_node(child)?);
                }
                (items, Some(g.boolean_operator))
            }
        };
        self.items = items;
        self.root_operator = root_operator;
        self.refresh_show_flag();
        log::debug!(
            "editor loaded: {} top-level item(s), root toggle {}",
            self.items.len(),
            if self.show_condition_group { "shown" } else { "hidden" },
        );
        Ok(())
    }
}

fn item_to_node(item: &EditorItem) -> Option<Node> {
    match item {
        EditorItem::Condition(d) => d.build().map(Node::Condition),
        EditorItem::Group(g) => {
            let children: Vec<Node> =
                g.children.iter().filter_map(|d| d.build().map(Node::Condition)).collect();
            if children.is_empty() {
                None
            } else {
                Some(Node::Group(ConditionGroup {
                    boolean_operator: g.boolean_operator,
                    children,
                }))
            }
        }
    }
}

fn item_from_node(node: &Node) -> Result<EditorItem, LoadError> {
    match node {
        Node::Condition(c) => Ok(EditorItem::Condition(ConditionDraft::from_wire(c))),
        Node::Group(g) => {
            let mut children = Vec::with_capacity(g.children.len());
            for child in &g.children {
                match child {
                    Node::Condition(c) => children.push(ConditionDraft::from_wire(c)),
                    Node::Group(_) => return Err(LoadError::TooDeep),
                }
            }
            Ok(EditorItem::Group(GroupDraft {
                boolean_operator: g.boolean_operator,
                children,
            }))
        }
    }
}

fn validate_draft(draft: &ConditionDraft, path: NodePath, errors: &mut Vec<ValidationError>) {
    let before = errors.len();
    if draft.expression.is_none() {
        errors.push(ValidationError::MissingExpression { path: path.to_string() });
    }
    if draft.operator.is_none() {
        errors.push(ValidationError::MissingOperator { path: path.to_string() });
    }
    if draft.value.is_none() {
        errors.push(ValidationError::MissingValue { path: path.to_string() });
    }
    if errors.len() > before {
        return;
    }
    // Complete draft: run the full condition checks (blank tokens, shape).
    if let Some(condition) = draft.build() {
        validate_condition(&condition, &path.to_string(), errors);
    }
}
