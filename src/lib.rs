//! Mail Assist — rule-based mail triage core.

pub mod assistant;
pub mod config;
pub mod error;
pub mod mail;
pub mod rules;
pub mod store;
pub mod triage;
