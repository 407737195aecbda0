//! Persistence boundary for rule documents and the submit flow that
//! drives it.
//!
//! The engine does not talk to the network itself; the owning application
//! implements [`RuleStore`] over its REST client. Per the platform
//! contract every write returns a plain success boolean, and a save is
//! always a full-document replace.

use crate::editor::{LoadError, TreeEditor};
use crate::eval::describe;
use crate::model::{Node, RiskDetectRule, ValidationError};

/// External persistence operations for rule documents. A `false` return
/// means the write did not happen and the caller should retry.
pub trait RuleStore {
    /// Fetch the rule bound to a risk level, if one exists.
    fn list(&self, risk_level_id: u64) -> Option<RiskDetectRule>;
    /// Create a rule for a risk level. The store assigns the id.
    fn create(&mut self, risk_level_id: u64, root: &Node) -> bool;
    /// Replace an existing rule's tree.
    fn update(&mut self, rule_id: u64, root: &Node) -> bool;
    /// Remove the entire rule document.
    fn delete(&mut self, rule_id: u64) -> bool;
}

/// Outcome of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The tree was persisted; editor state was cleared and the owning
    /// page should refetch the authoritative rule.
    Saved,
    /// The editor was empty: nothing to create, nothing sent.
    Skipped,
    /// Field validation failed; nothing was sent.
    Rejected(Vec<ValidationError>),
    /// The store reported failure; editor state is untouched for retry.
    Failed,
}

/// One editing session: one editor bound to one risk level's rule.
///
/// Exclusive mutable access is the double-submit guard: the UI disables
/// its trigger while `submit` runs, and the borrow checker keeps a second
/// call from overlapping it.
#[derive(Debug, Default)]
pub struct RuleSession {
    risk_level_id: u64,
    rule_id: Option<u64>,
    pub editor: TreeEditor,
}

impl RuleSession {
    /// Start a session for a risk level with no persisted rule.
    pub fn new(risk_level_id: u64) -> Self {
        Self {
            risk_level_id,
            rule_id: None,
            editor: TreeEditor::new(),
        }
    }

    /// Start a session, loading the persisted rule for the risk level if
    /// one exists.
    pub fn open(store: &impl RuleStore, risk_level_id: u64) -> Result<Self, LoadError> {
        let mut session = Self::new(risk_level_id);
        if let Some(rule) = store.list(risk_level_id) {
            session.editor.load(&rule.root_node)?;
            session.rule_id = Some(rule.id);
        }
        Ok(session)
    }

    pub fn risk_level_id(&self) -> u64 {
        self.risk_level_id
    }

    /// The persisted rule id, once known.
    pub fn rule_id(&self) -> Option<u64> {
        self.rule_id
    }

    /// Validate, serialize, and persist the in-progress tree.
    ///
    /// An empty tree suppresses creation (no-op, not an error). On store
    /// failure the editor keeps its state so the user can retry; on
    /// success the in-progress state is cleared and the caller refetches.
    pub fn submit(&mut self, store: &mut impl RuleStore) -> SubmitOutcome {
        let root = match self.editor.serialize() {
            Err(errors) => {
                log::debug!("submit rejected: {} field error(s)", errors.len());
                return SubmitOutcome::Rejected(errors);
            }
            Ok(None) => {
                log::debug!(
                    "submit skipped: no conditions for risk level {}",
                    self.risk_level_id
                );
                return SubmitOutcome::Skipped;
            }
            Ok(Some(node)) => node,
        };

        let ok = match self.rule_id {
            Some(id) => store.update(id, &root),
            None => store.create(self.risk_level_id, &root),
        };
        if !ok {
            log::warn!(
                "rule save failed for risk level {}; keeping editor state for retry",
                self.risk_level_id
            );
            return SubmitOutcome::Failed;
        }

        log::info!(
            "rule saved for risk level {}: {}",
            self.risk_level_id,
            describe(&root)
        );
        self.editor.clear();
        SubmitOutcome::Saved
    }

    /// Delete the persisted rule document. Clears the session on success.
    pub fn delete(&mut self, store: &mut impl RuleStore) -> bool {
        let Some(id) = self.rule_id else {
            return false;
        };
        if !store.delete(id) {
            log::warn!("rule delete failed for rule {id}");
            return false;
        }
        log::info!("rule {id} deleted for risk level {}", self.risk_level_id);
        self.rule_id = None;
        self.editor.clear();
        true
    }
}

/// In-memory store used by tests and the CLI demo. `fail_writes`
/// exercises the keep-state-and-retry path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rules: Vec<RiskDetectRule>,
    next_id: u64,
    pub fail_writes: bool,
    pub create_calls: usize,
    pub update_calls: usize,
    pub delete_calls: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[RiskDetectRule] {
        &self.rules
    }
}

impl RuleStore for MemoryStore {
    fn list(&self, risk_level_id: u64) -> Option<RiskDetectRule> {
        self.rules.iter().find(|r| r.risk_level_id == risk_level_id).cloned()
    }

    fn create(&mut self, risk_level_id: u64, root: &Node) -> bool {
        self.create_calls += 1;
        if self.fail_writes {
            return false;
        }
        self.next_id += 1;
        self.rules.push(RiskDetectRule {
            id: self.next_id,
            risk_level_id,
            name: None,
            root_node: root.clone(),
            creator: None,
            create_time: None,
        });
        true
    }

    fn update(&mut self, rule_id: u64, root: &Node) -> bool {
        self.update_calls += 1;
        if self.fail_writes {
            return false;
        }
        match self.rules.iter_mut().find(|r| r.id == rule_id) {
            Some(rule) => {
                rule.root_node = root.clone();
                true
            }
            None => false,
        }
    }

    fn delete(&mut self, rule_id: u64) -> bool {
        self.delete_calls += 1;
        if self.fail_writes {
            return false;
        }
        let before = self.rules.len();
        self.rules.retain(|r| r.id != rule_id);
        self.rules.len() < before
    }
}
