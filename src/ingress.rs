//! Upstream input types: the per-Ingress routing pairs this core reconciles
//!
//! The Ingress-spec parser (external to this core) produces, per Ingress, an
//! ordered list of (path, backend-service) pairs and an identifier used for
//! log correlation. One [`Rule`](crate::elbv2::Rule) is constructed per pair.

use serde::{Deserialize, Serialize};

use crate::elbv2::Rule;

/// A single HTTP path and the backend service it routes to
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct IngressPath {
    /// The URL path to match (`"/"` maps onto the listener's default rule)
    pub path: String,
    /// Name of the backend service receiving forwarded traffic
    pub service: String,
}

impl IngressPath {
    /// Create a new path/backend pair
    pub fn new(path: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            service: service.into(),
        }
    }
}

/// Build one reconciliation [`Rule`] per declared Ingress path
pub fn rules_for_ingress(ingress_id: &str, paths: &[IngressPath]) -> Vec<Rule> {
    paths.iter().map(|p| Rule::new(p, ingress_id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_rule_per_path() {
        let paths = vec![
            IngressPath::new("/", "svc-root"),
            IngressPath::new("/api", "svc-api"),
            IngressPath::new("/static", "svc-static"),
        ];

        let rules = rules_for_ingress("default/web", &paths);
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].service_name(), "svc-root");
        assert_eq!(rules[1].service_name(), "svc-api");
        assert_eq!(rules[2].service_name(), "svc-static");
    }

    #[test]
    fn test_no_paths_no_rules() {
        assert!(rules_for_ingress("default/web", &[]).is_empty());
    }
}
