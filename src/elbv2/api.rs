//! Cloud API collaborator for listener rule mutations
//!
//! The reconciler consumes this trait rather than a concrete SDK client so
//! the state machine can be exercised against a mock in tests while the host
//! controller wires in the real ELBv2 client in production.

use async_trait::async_trait;

use crate::elbv2::types::{RoutingRule, RuleAction, RuleCondition};
use crate::Result;

#[cfg(test)]
use mockall::automock;

/// Request payload for creating a listener rule
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateRuleInput {
    /// ARN of the listener the rule attaches to
    pub listener_arn: String,
    /// Unique priority among the listener's non-default rules
    pub priority: i64,
    /// Match clauses for the new rule
    pub conditions: Vec<RuleCondition>,
    /// Actions for the new rule, target groups already resolved
    pub actions: Vec<RuleAction>,
}

/// Operations this core issues against the cloud load balancer API
///
/// All calls are plain request/response: no partial-progress state is exposed
/// to callers, and no timeout or cancellation contract is imposed here. A
/// caller with a deadline wraps the whole reconciliation pass and retries on
/// the next cycle.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Elbv2Api: Send + Sync {
    /// Create a rule on a listener, returning the rule as the cloud sees it
    async fn create_rule(&self, input: CreateRuleInput) -> Result<RoutingRule>;

    /// Delete a rule by ARN
    async fn delete_rule(&self, rule_arn: String) -> Result<()>;

    /// Replace a rule's conditions and actions, returning the updated rule
    async fn modify_rule(
        &self,
        rule_arn: String,
        actions: Vec<RuleAction>,
        conditions: Vec<RuleCondition>,
    ) -> Result<RoutingRule>;
}
