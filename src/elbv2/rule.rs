//! Per-path rule reconciliation
//!
//! This module implements the reconciliation state machine for a single
//! Ingress path. It follows the controller pattern: observe current state,
//! compare with desired state, and issue the minimal cloud mutation to
//! converge them. At most one mutation is issued per pass; the entity is
//! rebuilt from scratch on the next pass, so a failed pass is safely retried.

use tracing::{debug, error, info, warn};

use crate::elbv2::api::{CreateRuleInput, Elbv2Api};
use crate::elbv2::listener::Listener;
use crate::elbv2::target_group::{TargetGroup, TargetGroups};
use crate::elbv2::types::{
    canonical_conditions, prettify, RoutingRule, RuleAction, RuleCondition, RulePriority,
};
use crate::ingress::IngressPath;
use crate::metrics::{self, SERVICE_ELBV2};
use crate::{Error, Result, ROOT_PATH};

/// Reconciliation entity pairing an Ingress path's desired routing rule with
/// the rule observed on the cloud listener
///
/// `desired == None` means the rule should not exist and always converges
/// toward deletion. `current == None` means the rule does not exist in the
/// cloud yet. The desired side is immutable after construction; the current
/// side is updated in place as cloud operations succeed.
#[derive(Debug)]
pub struct Rule {
    ingress: String,
    service: String,
    desired: Option<RoutingRule>,
    current: Option<RoutingRule>,
}

impl Rule {
    /// Build the desired rule for one Ingress path
    ///
    /// The root path maps onto the listener's default rule, which is created
    /// together with the listener and never separately created or deleted
    /// here. Any other path becomes a non-default rule with a single
    /// path-pattern condition; its forwarding action stays unresolved until
    /// create-time lookup in the sibling target-group collection.
    pub fn new(path: &IngressPath, ingress_id: impl Into<String>) -> Self {
        let desired = if path.path == ROOT_PATH {
            RoutingRule {
                rule_arn: None,
                is_default: true,
                priority: Some(RulePriority::Default),
                conditions: Vec::new(),
                actions: vec![RuleAction::forward()],
            }
        } else {
            RoutingRule {
                rule_arn: None,
                is_default: false,
                priority: None,
                conditions: vec![RuleCondition::path_pattern(path.path.clone())],
                actions: vec![RuleAction::forward()],
            }
        };

        Self {
            ingress: ingress_id.into(),
            service: path.service.clone(),
            desired: Some(desired),
            current: None,
        }
    }

    /// Ingress identifier used for log correlation
    pub fn ingress_id(&self) -> &str {
        &self.ingress
    }

    /// Backend service this path routes to
    pub fn service_name(&self) -> &str {
        &self.service
    }

    /// The rule as computed from the Ingress spec, if it should exist
    pub fn desired(&self) -> Option<&RoutingRule> {
        self.desired.as_ref()
    }

    /// The rule as last observed in the cloud, if it exists
    pub fn current(&self) -> Option<&RoutingRule> {
        self.current.as_ref()
    }

    /// Record the rule observed in the cloud (the external fetch step)
    pub fn set_current(&mut self, rule: Option<RoutingRule>) {
        self.current = rule;
    }

    /// Mark the rule for deletion: the path no longer appears in the Ingress spec
    pub fn clear_desired(&mut self) {
        self.desired = None;
    }

    /// Compare current and desired state and issue the minimal cloud
    /// operation to converge them
    ///
    /// Branches are evaluated in priority order, first match wins:
    /// no desired rule means delete; a desired default rule is already
    /// satisfied by the listener itself; no current rule means create;
    /// drifted conditions mean modify; otherwise nothing to do.
    pub async fn sync(
        &mut self,
        api: &dyn Elbv2Api,
        listener: &Listener,
        target_groups: &TargetGroups,
    ) -> Result<()> {
        if self.desired.is_none() {
            info!(ingress = %self.ingress, "starting rule deletion");
            return self.delete(api).await;
        }

        if self.desired.as_ref().is_some_and(|d| d.is_default) {
            debug!(
                ingress = %self.ingress,
                rule = %prettify(&self.desired),
                "desired rule is the listener's default and was created with it"
            );
            self.current = self.desired.clone();
            return Ok(());
        }

        if self.current.is_none() {
            info!(ingress = %self.ingress, "starting rule creation");
            return self.create(api, listener, target_groups).await;
        }

        if self.needs_modification() {
            info!(ingress = %self.ingress, "starting rule modification");
            return self.modify(api, target_groups).await;
        }

        debug!(ingress = %self.ingress, "rule already converged; no modification required");
        Ok(())
    }

    /// Returns true when a modify call is needed to converge: the current
    /// rule is missing, or its canonical conditions differ from desired.
    ///
    /// Actions are deliberately not compared: the desired action's target
    /// group ARN is not populated until create-time resolution, so a raw
    /// comparison would report permanent drift.
    pub fn needs_modification(&self) -> bool {
        let Some(current) = &self.current else {
            return true;
        };
        match &self.desired {
            Some(desired) => {
                canonical_conditions(&current.conditions)
                    != canonical_conditions(&desired.conditions)
            }
            None => false,
        }
    }

    /// Compare the current rule against a supplied rule on `is_default` and
    /// canonical conditions only
    ///
    /// Priority is never compared: the Ingress spec carries no ordering
    /// concept. If either side is absent the result is false, including when
    /// both are: equality is never asserted in the absence of both sides.
    pub fn equals(&self, target: Option<&RoutingRule>) -> bool {
        match (&self.current, target) {
            (Some(current), Some(target)) => {
                current.is_default == target.is_default
                    && canonical_conditions(&current.conditions)
                        == canonical_conditions(&target.conditions)
            }
            _ => false,
        }
    }

    /// Resolve the forwarding actions' target group from the backend service
    /// name, defaulting to the collection's first target group when the
    /// service has none registered
    fn resolve_forward_actions(
        &self,
        desired: &RoutingRule,
        target_groups: &TargetGroups,
    ) -> Result<Vec<RuleAction>> {
        let target_group_arn = match target_groups
            .lookup_by_service(&self.service)
            .and_then(|index| target_groups.get(index))
        {
            Some(tg) => tg.arn().to_string(),
            None => {
                error!(
                    ingress = %self.ingress,
                    service = %self.service,
                    "no target group registered for service; defaulting to the first target group"
                );
                target_groups
                    .first()
                    .map(TargetGroup::arn)
                    .ok_or_else(|| {
                        Error::validation(format!(
                            "listener has no target groups to forward to (service {})",
                            self.service
                        ))
                    })?
                    .to_string()
            }
        };

        let mut actions = desired.actions.clone();
        for action in &mut actions {
            action.target_group_arn = Some(target_group_arn.clone());
        }
        Ok(actions)
    }

    /// Create the desired rule on the listener
    ///
    /// The priority counter lock is held across the whole call: the request
    /// carries the counter's current value, and the counter advances by
    /// exactly one only once the cloud accepts the rule. On failure nothing
    /// is mutated and the pass is retried on the next cycle.
    async fn create(
        &mut self,
        api: &dyn Elbv2Api,
        listener: &Listener,
        target_groups: &TargetGroups,
    ) -> Result<()> {
        let desired = self.desired.as_ref().ok_or_else(|| {
            Error::internal_with_context("rule-create", "create invoked without a desired rule")
        })?;

        let actions = self.resolve_forward_actions(desired, target_groups)?;
        let conditions = desired.conditions.clone();
        let desired_pretty = prettify(desired);

        let mut priority = listener.lock_priority().await;
        let input = CreateRuleInput {
            listener_arn: listener.arn().to_string(),
            priority: *priority,
            conditions,
            actions,
        };

        metrics::record_api_call(SERVICE_ELBV2, "CreateRule");
        match api.create_rule(input).await {
            Ok(rule) => {
                // All rules on a listener must carry a unique priority.
                *priority += 1;
                info!(
                    ingress = %self.ingress,
                    rule = %prettify(&rule),
                    "completed rule creation"
                );
                self.current = Some(rule);
                Ok(())
            }
            Err(e) => {
                metrics::record_api_error(SERVICE_ELBV2, "CreateRule");
                error!(
                    ingress = %self.ingress,
                    rule = %desired_pretty,
                    error = %e,
                    "failed rule creation"
                );
                Err(e)
            }
        }
    }

    /// Replace the current rule's conditions and actions with the desired
    /// ones
    ///
    /// Actions are re-resolved against the target-group collection, so a
    /// target group that appeared after the rule was created gets picked up
    /// here. Priority is never modified.
    async fn modify(&mut self, api: &dyn Elbv2Api, target_groups: &TargetGroups) -> Result<()> {
        let desired = self.desired.as_ref().ok_or_else(|| {
            Error::internal_with_context("rule-modify", "modify invoked without a desired rule")
        })?;
        let rule_arn = self
            .current
            .as_ref()
            .and_then(|c| c.rule_arn.clone())
            .ok_or_else(|| {
                Error::internal_with_context("rule-modify", "current rule has no ARN")
            })?;

        let actions = self.resolve_forward_actions(desired, target_groups)?;
        let conditions = desired.conditions.clone();
        let desired_pretty = prettify(desired);

        metrics::record_api_call(SERVICE_ELBV2, "ModifyRule");
        match api.modify_rule(rule_arn, actions, conditions).await {
            Ok(rule) => {
                info!(
                    ingress = %self.ingress,
                    rule = %prettify(&rule),
                    "completed rule modification"
                );
                self.current = Some(rule);
                Ok(())
            }
            Err(e) => {
                metrics::record_api_error(SERVICE_ELBV2, "ModifyRule");
                error!(
                    ingress = %self.ingress,
                    rule = %desired_pretty,
                    error = %e,
                    "failed rule modification"
                );
                Err(e)
            }
        }
    }

    /// Delete the current rule from the listener
    ///
    /// A missing current rule is a successful no-op. The listener's default
    /// rule is bound to the listener and owned by its reconciliation loop;
    /// deletion of one is logged as a warning but the call is still issued.
    async fn delete(&mut self, api: &dyn Elbv2Api) -> Result<()> {
        let (rule_arn, current_pretty) = match &self.current {
            None => {
                info!(
                    ingress = %self.ingress,
                    "rule entered delete with no current rule; nothing to remove"
                );
                return Ok(());
            }
            Some(current) => {
                if current.is_default {
                    warn!(
                        ingress = %self.ingress,
                        rule = %prettify(current),
                        "deletion hit the listener's default rule, which is bound to the listener"
                    );
                }
                let arn = current.rule_arn.clone().ok_or_else(|| {
                    Error::internal_with_context("rule-delete", "current rule has no ARN")
                })?;
                (arn, prettify(current))
            }
        };

        metrics::record_api_call(SERVICE_ELBV2, "DeleteRule");
        match api.delete_rule(rule_arn).await {
            Ok(()) => {
                info!(
                    ingress = %self.ingress,
                    rule = %current_pretty,
                    "completed rule deletion"
                );
                self.current = None;
                Ok(())
            }
            Err(e) => {
                metrics::record_api_error(SERVICE_ELBV2, "DeleteRule");
                Err(e)
            }
        }
    }
}
