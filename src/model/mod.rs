//! Wire data model for risk-detection rules.
//!
//! A rule is a tree of [`Node`]s: `CONDITION` leaves (attribute, operator,
//! value) and `CONDITION_GROUP` internal nodes (AND/OR over children). The
//! serde derives here are the bit-exact JSON contract with the platform;
//! see [`RiskDetectRule`] for the full persisted document.

pub mod node;
pub mod validate;

pub use node::{
    BoolOperator, Condition, ConditionGroup, CreateTime, Creator, Expression, Node, Operator,
    RiskDetectRule, Value,
};
pub use validate::{ValidationError, validate_root, validate_rule};
