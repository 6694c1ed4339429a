//! ELBv2 routing-rule reconciliation
//!
//! This module owns the typed representation of a listener's routing rules
//! and the state machine that converges a desired rule (computed from an
//! Ingress path) onto the rule observed in the cloud. It follows the
//! controller pattern: observe current state, compare with desired state,
//! issue the minimal mutation.
//!
//! - [`types`] - routing-rule snapshots exchanged with the cloud API
//! - [`api`] - the cloud API collaborator trait
//! - [`listener`] - the listener a rule attaches to, owning the priority counter
//! - [`target_group`] - the sibling target-group collection rules forward to
//! - [`rule`] - the per-path reconciliation entity and its sync state machine

pub mod api;
pub mod listener;
pub mod rule;
pub mod target_group;
pub mod types;

pub use api::{CreateRuleInput, Elbv2Api};
pub use listener::Listener;
pub use rule::Rule;
pub use target_group::{TargetGroup, TargetGroups};
pub use types::{ActionType, RoutingRule, RuleAction, RuleCondition, RulePriority};
