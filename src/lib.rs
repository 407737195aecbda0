//! risk-rules: the risk-detection rule engine for a database-change
//! management platform.
//!
//! A rule is a condition tree — `CONDITION` leaves over change-request
//! attributes (environment, project, database, task type, SQL-check
//! result) combined by `CONDITION_GROUP` nodes under AND/OR — bound 1:1
//! to a risk level. This crate models the tree, edits it through a small
//! state machine, evaluates it against candidate change requests, and
//! drives a pluggable persistence boundary.
//!
//! # Architecture
//!
//! - **[`model`]** — Wire data model: tagged [`Node`](model::Node) union,
//!   rule documents, validation.
//! - **[`editor`]** — Tree editor state: add/remove/toggle operations,
//!   value-widget resolution, serialize/load.
//! - **[`eval`]** — Evaluation: [`ChangeContext`](eval::ChangeContext)
//!   matching and ordered-rule classification.
//! - **[`catalog`]** — Environment/task-type/check-result option lists
//!   with code↔label lookup.
//! - **[`store`]** — Persistence boundary trait and the submit flow.
//! - **[`config`]** — Catalog configuration: embedded defaults + user
//!   overlay merge.
//! - **[`logging`]** — Terminal + audit-file logging setup.

/// Environment/task-type/check-result catalogs and lookup.
pub mod catalog;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Tree editor state machine and value-widget resolution.
pub mod editor;
/// Evaluation engine: context matching, classification, reason traces.
pub mod eval;
/// simplelog-based logging setup.
pub mod logging;
/// Wire data model and validation.
pub mod model;
/// Rule persistence boundary and submit flow.
pub mod store;

pub use eval::{ChangeContext, RuleMatch, classify};
pub use model::{Node, RiskDetectRule};
