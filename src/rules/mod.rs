//! Automation rules — data model, evaluation, execution, and parsing.

pub mod engine;
pub mod eval;
pub mod model;
pub mod parser;

pub use engine::{ActionOutcome, ActionStatus, ExecutionReport, RuleEngine, RuleMatch};
pub use model::{
    ActionKind, ConditionField, ConditionOperator, ConditionValue, Rule, RuleAction,
    RuleCondition,
};
pub use parser::RuleParser;
