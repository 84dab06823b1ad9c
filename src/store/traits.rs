//! Persistence collaborator trait — rules and prioritization criteria.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::rules::model::Rule;
use crate::triage::scorer::PrioritizationCriteria;

/// Backend-agnostic persistence for automation rules and the user's
/// prioritization criteria.
///
/// The core reads rules for an execution pass and round-trips criteria;
/// storage failures are surfaced to the caller as-is — there is no
/// recovery logic here.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Persist a rule. Returns the store-assigned ID.
    async fn save_rule(&self, rule: &Rule) -> Result<i64, StorageError>;

    /// Load rules, optionally only enabled ones.
    async fn load_rules(&self, enabled_only: bool) -> Result<Vec<Rule>, StorageError>;

    /// Delete a rule by ID. Returns whether a rule was removed.
    async fn delete_rule(&self, id: i64) -> Result<bool, StorageError>;

    /// Enable or disable a rule. Returns whether a rule was updated.
    async fn set_rule_enabled(&self, id: i64, enabled: bool) -> Result<bool, StorageError>;

    /// Load the user's prioritization criteria, if any were saved.
    async fn load_criteria(&self) -> Result<Option<PrioritizationCriteria>, StorageError>;

    /// Save (create or update in place) the prioritization criteria.
    async fn save_criteria(&self, criteria: &PrioritizationCriteria) -> Result<(), StorageError>;

    /// Remove all prioritization criteria.
    async fn clear_criteria(&self) -> Result<(), StorageError>;
}
