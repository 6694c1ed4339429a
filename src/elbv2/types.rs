//! Typed routing-rule snapshots exchanged with the cloud API

use std::fmt;

use serde::{Deserialize, Serialize};

/// Condition field matching a request's URL path against a pattern list
pub const FIELD_PATH_PATTERN: &str = "path-pattern";

/// Priority of a routing rule within its listener
///
/// Every non-default rule carries a unique ordinal; the listener's own
/// catch-all rule carries the `default` sentinel instead.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RulePriority {
    /// The listener's default (catch-all) rule
    Default,
    /// Unique ordinal among the listener's non-default rules
    Ordinal(i64),
}

impl fmt::Display for RulePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Ordinal(n) => write!(f, "{}", n),
        }
    }
}

/// A single match clause on a routing rule
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RuleCondition {
    /// Condition kind (e.g. [`FIELD_PATH_PATTERN`])
    pub field: String,
    /// Values the clause matches against
    pub values: Vec<String>,
}

impl RuleCondition {
    /// Create a path-pattern condition matching a single path
    pub fn path_pattern(path: impl Into<String>) -> Self {
        Self {
            field: FIELD_PATH_PATTERN.to_string(),
            values: vec![path.into()],
        }
    }
}

/// Kind of action a routing rule performs
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// Forward the request to a target group
    #[default]
    Forward,
}

/// A single action on a routing rule
///
/// In this core every rule carries exactly one forwarding action. The target
/// group ARN stays unset until create/modify-time resolution, when the
/// backend service name is looked up in the sibling target-group collection.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RuleAction {
    /// What the action does
    pub action_type: ActionType,
    /// ARN of the target group receiving forwarded traffic
    pub target_group_arn: Option<String>,
}

impl RuleAction {
    /// Create a forwarding action with an unresolved target group
    pub fn forward() -> Self {
        Self {
            action_type: ActionType::Forward,
            target_group_arn: None,
        }
    }
}

/// A routing rule as desired from the Ingress spec or observed on a listener
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RoutingRule {
    /// Cloud identifier; unset until the rule exists in the cloud
    pub rule_arn: Option<String>,
    /// Whether this is the listener's default (catch-all) rule
    pub is_default: bool,
    /// Match precedence within the listener; unset on a desired non-default
    /// rule until create-time assignment from the listener's counter
    pub priority: Option<RulePriority>,
    /// Ordered match clauses
    pub conditions: Vec<RuleCondition>,
    /// Ordered actions; always exactly one forwarding action here
    pub actions: Vec<RuleAction>,
}

/// Sort conditions into canonical form: ascending by field, each value list
/// ascending. Comparisons between desired and observed rules go through this
/// so the cloud's arbitrary ordering never registers as drift.
pub(crate) fn canonical_conditions(conditions: &[RuleCondition]) -> Vec<RuleCondition> {
    let mut sorted: Vec<RuleCondition> = conditions
        .iter()
        .map(|c| {
            let mut values = c.values.clone();
            values.sort();
            RuleCondition {
                field: c.field.clone(),
                values,
            }
        })
        .collect();
    sorted.sort_by(|a, b| a.field.cmp(&b.field));
    sorted
}

/// Pretty-print a serializable value for log correlation
pub(crate) fn prettify<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<unserializable>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_display() {
        assert_eq!(RulePriority::Default.to_string(), "default");
        assert_eq!(RulePriority::Ordinal(5).to_string(), "5");
    }

    #[test]
    fn test_path_pattern_condition() {
        let cond = RuleCondition::path_pattern("/api");
        assert_eq!(cond.field, FIELD_PATH_PATTERN);
        assert_eq!(cond.values, vec!["/api"]);
    }

    #[test]
    fn test_canonical_conditions_order_value_lists() {
        let a = vec![RuleCondition {
            field: FIELD_PATH_PATTERN.to_string(),
            values: vec!["/b".to_string(), "/a".to_string()],
        }];
        let b = vec![RuleCondition {
            field: FIELD_PATH_PATTERN.to_string(),
            values: vec!["/a".to_string(), "/b".to_string()],
        }];
        assert_eq!(canonical_conditions(&a), canonical_conditions(&b));
    }

    #[test]
    fn test_canonical_conditions_order_fields() {
        let host = RuleCondition {
            field: "host-header".to_string(),
            values: vec!["example.com".to_string()],
        };
        let path = RuleCondition::path_pattern("/api");

        let forward = canonical_conditions(&[host.clone(), path.clone()]);
        let reverse = canonical_conditions(&[path, host]);
        assert_eq!(forward, reverse);
        assert_eq!(forward[0].field, "host-header");
    }

    #[test]
    fn test_prettify_renders_json() {
        let action = RuleAction::forward();
        let pretty = prettify(&action);
        assert!(pretty.contains("forward"));
    }
}
