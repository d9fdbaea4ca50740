//! Posting policy: static operation type to GL account mapping.
//!
//! Callers describe a business operation (a fee, a deposit, an interest accrual);
//! the mapper resolves GL accounts from the policy and posts through the composer.

pub mod mapper;
pub mod standard;
pub mod types;

#[cfg(test)]
mod mapper_props;

pub use mapper::{synthesize_lines, PostingPolicyMapper};
pub use standard::{chart_from_config, standard_chart, PostingPolicy};
pub use types::{OperationType, PolicyPostingRequest, PolicyRule, RoleBinding};
