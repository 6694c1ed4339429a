//! The sibling target-group collection rules forward to

use serde::{Deserialize, Serialize};

/// A target group belonging to the load balancer
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TargetGroup {
    arn: String,
    service: String,
}

impl TargetGroup {
    /// Create a target group handle for the given backend service
    pub fn new(arn: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            service: service.into(),
        }
    }

    /// Cloud identifier of the target group
    pub fn arn(&self) -> &str {
        &self.arn
    }

    /// Backend service this target group fronts
    pub fn service(&self) -> &str {
        &self.service
    }
}

/// Ordered collection of the load balancer's target groups
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TargetGroups(Vec<TargetGroup>);

impl TargetGroups {
    /// Create an empty collection
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a target group
    pub fn push(&mut self, tg: TargetGroup) {
        self.0.push(tg);
    }

    /// Find the index of the target group fronting the given service
    pub fn lookup_by_service(&self, service: &str) -> Option<usize> {
        self.0.iter().position(|tg| tg.service() == service)
    }

    /// The collection's first target group, the create-time fallback
    pub fn first(&self) -> Option<&TargetGroup> {
        self.0.first()
    }

    /// Target group at the given index
    pub fn get(&self, index: usize) -> Option<&TargetGroup> {
        self.0.get(index)
    }

    /// Number of target groups
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<TargetGroup>> for TargetGroups {
    fn from(groups: Vec<TargetGroup>) -> Self {
        Self(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TargetGroups {
        TargetGroups::from(vec![
            TargetGroup::new("arn:tg/a", "svc-a"),
            TargetGroup::new("arn:tg/b", "svc-b"),
        ])
    }

    #[test]
    fn test_lookup_by_service() {
        let tgs = sample();
        assert_eq!(tgs.lookup_by_service("svc-b"), Some(1));
        assert_eq!(tgs.lookup_by_service("svc-missing"), None);
    }

    #[test]
    fn test_first_is_fallback_order() {
        let tgs = sample();
        assert_eq!(tgs.first().map(TargetGroup::arn), Some("arn:tg/a"));
        assert!(TargetGroups::new().first().is_none());
    }
}
